use crate::types::{Message, Role, ToolChoice};
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Duration;
use tracing::debug;

/// One request to the chat-completions endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    /// `tools` array; `None` sends no catalog.
    pub tools: Option<Value>,
    pub tool_choice: ToolChoice,
}

impl ChatRequest {
    pub fn new(messages: &[Message]) -> Self {
        Self {
            messages: messages.to_vec(),
            tools: None,
            tool_choice: ToolChoice::Auto,
        }
    }

    pub fn with_tools(mut self, tools: Value, tool_choice: ToolChoice) -> Self {
        // An empty catalog is the same as no catalog on the wire.
        if tools.as_array().is_some_and(|t| !t.is_empty()) {
            self.tools = Some(tools);
            self.tool_choice = tool_choice;
        }
        self
    }

    pub fn to_body(&self, model: &str) -> Value {
        let mut body = serde_json::json!({
            "model": model,
            "messages": self.messages,
            "stream": false,
        });
        if let Some(tools) = &self.tools {
            body["tools"] = tools.clone();
            body["tool_choice"] = self.tool_choice.to_value();
        }
        body
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Clone)]
pub struct LlmClient {
    base_url: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(8)
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url,
            api_key,
            model,
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn chat_once(&self, request: &ChatRequest) -> anyhow::Result<Message> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            url = %url,
            messages = request.messages.len(),
            with_tools = request.tools.is_some(),
            "sending chat completion request"
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request.to_body(&self.model))
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;

        let status = resp.status();
        let response_text = resp.text().await?;
        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| anyhow::anyhow!("Failed to parse JSON response ({}): {}", status, e))?;

        // Check for API error
        if let Some(error) = response_json.get("error") {
            let detail = error["message"].as_str().unwrap_or("unknown error");
            anyhow::bail!("API error ({}): {}", status, detail);
        }
        if !status.is_success() {
            anyhow::bail!("API returned {}: {}", status, response_text);
        }

        let parsed: CompletionResponse = serde_json::from_value(response_json)
            .context("unexpected chat completion shape")?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| anyhow::anyhow!("No choices in response"))?;

        if message.role != Role::Assistant {
            anyhow::bail!("expected an assistant message, got {:?}", message.role);
        }
        Ok(message)
    }
}
