use anyhow::{Context, bail};
use tokio::time::Duration;

use crate::cli_args::ClientArgs;
use crate::llm_client::LlmClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Validated settings for talking to the chat service.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_args(args: &ClientArgs) -> anyhow::Result<Self> {
        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .context("OPENAI_API_KEY not set (pass --api-key or export it)")?;

        let base_url = args.base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("base URL must start with http:// or https://, got '{}'", args.base_url);
        }
        if args.model.trim().is_empty() {
            bail!("model name must not be empty");
        }
        if args.timeout_secs == 0 {
            bail!("timeout must be at least one second");
        }

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: args.model.trim().to_string(),
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }

    pub fn build_client(&self) -> anyhow::Result<LlmClient> {
        LlmClient::new(
            self.base_url.clone(),
            self.api_key.clone(),
            self.model.clone(),
            self.timeout,
        )
    }
}
