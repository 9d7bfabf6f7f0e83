use crate::error::{AgentError, ToolError};
use crate::llm_client::{ChatRequest, LlmClient};
use crate::session::Session;
use crate::tool_registry::ToolRegistry;
use crate::types::{Message, ToolCall, ToolChoice};
use crate::utils::clip;
use async_trait::async_trait;
use tokio::time::{Duration, timeout};
use tracing::{debug, info, warn};

/// Tool result recorded for calls the follow-up reply makes. The service
/// rejects a history with tool calls that have no matching results.
pub const NOT_EXECUTED_PAYLOAD: &str = r#"{"error":"Not executed: only one tool round per turn"}"#;

/// The remote side of the conversation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<Message>;
}

#[async_trait]
impl ChatService for LlmClient {
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<Message> {
        self.chat_once(request).await
    }
}

/// Hooks for showing progress while a turn runs. Every method defaults to
/// doing nothing.
pub trait TurnObserver {
    fn on_tool_requests(&mut self, _calls: &[ToolCall]) {}
    fn on_tool_call(&mut self, _call: &ToolCall) {}
    fn on_tool_result(&mut self, _call: &ToolCall, _content: &str) {}
    fn on_resubmit(&mut self) {}
}

struct Silent;

impl TurnObserver for Silent {}

#[derive(Clone, Debug)]
pub struct AgentOptions {
    pub step_timeout: Duration,
    pub observation_clip: usize, // chars per tool output
    /// Tool selection mode for the first call of a turn.
    pub tool_choice: ToolChoice,
    /// Send the catalog again on the follow-up call.
    pub resend_catalog: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(60),
            observation_clip: 8000,
            tool_choice: ToolChoice::Auto,
            resend_catalog: false,
        }
    }
}

/// What happened to one tool invocation during a turn.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolOutcome {
    pub call: ToolCall,
    pub result: Result<String, ToolError>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnOutcome {
    /// Text of the last assistant message of the turn.
    pub display_text: Option<String>,
    /// One entry per tool invocation, in the order the model listed them.
    pub tool_outcomes: Vec<ToolOutcome>,
    /// Tool calls in the follow-up reply. They are answered in history with
    /// a "not executed" result instead of being run.
    pub unresolved_tool_calls: usize,
}

impl TurnOutcome {
    pub fn used_tools(&self) -> bool {
        !self.tool_outcomes.is_empty()
    }

    pub fn tool_errors(&self) -> impl Iterator<Item = &ToolError> {
        self.tool_outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }
}

pub struct Agent {
    llm: Box<dyn ChatService>,
    tools: ToolRegistry,
    opts: AgentOptions,
}

impl Agent {
    pub fn new(llm: Box<dyn ChatService>, tools: ToolRegistry, opts: AgentOptions) -> Self {
        Self { llm, tools, opts }
    }

    #[cfg(test)]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Runs one user turn: ask the model, resolve any tool calls it makes,
    /// then ask once more with the results.
    pub async fn handle_turn(
        &self,
        session: &mut Session,
        user_input: &str,
    ) -> Result<TurnOutcome, AgentError> {
        self.handle_turn_observed(session, user_input, &mut Silent).await
    }

    pub async fn handle_turn_observed(
        &self,
        session: &mut Session,
        user_input: &str,
        observer: &mut dyn TurnObserver,
    ) -> Result<TurnOutcome, AgentError> {
        session.add_message(Message::user(user_input));

        let request = ChatRequest::new(session.messages())
            .with_tools(self.tools.schemas(), self.opts.tool_choice.clone());
        let first = self.ask(&request).await?;
        session.add_message(first.clone());

        let calls = first.requested_tools();
        if calls.is_empty() {
            return Ok(TurnOutcome {
                display_text: first.content,
                ..TurnOutcome::default()
            });
        }

        info!(count = calls.len(), "model requested tools");
        observer.on_tool_requests(calls);
        let tool_outcomes = self.resolve_tools(session, calls, observer);

        let mut request = ChatRequest::new(session.messages());
        if self.opts.resend_catalog {
            request = request.with_tools(self.tools.schemas(), ToolChoice::Auto);
        }
        observer.on_resubmit();
        let second = self.ask(&request).await?;
        session.add_message(second.clone());

        let unresolved = second.requested_tools();
        if !unresolved.is_empty() {
            warn!(
                count = unresolved.len(),
                "follow-up reply asked for more tools; only one round is resolved per turn"
            );
            for call in unresolved {
                session.add_message(Message::tool_result(
                    &call.id,
                    &call.function.name,
                    NOT_EXECUTED_PAYLOAD,
                ));
            }
        }
        let unresolved_tool_calls = unresolved.len();

        Ok(TurnOutcome {
            display_text: second.content.filter(|c| !c.trim().is_empty()),
            tool_outcomes,
            unresolved_tool_calls,
        })
    }

    /// Executes each call in order and appends one tool-result message per
    /// call. Tool failures become error payloads in the history.
    fn resolve_tools(
        &self,
        session: &mut Session,
        calls: &[ToolCall],
        observer: &mut dyn TurnObserver,
    ) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls {
            observer.on_tool_call(call);
            let result = self.tools.dispatch(call);
            let content = match &result {
                Ok(observation) => clip(observation, self.opts.observation_clip),
                Err(e) => {
                    warn!(tool = %call.function.name, call_id = %call.id, error = %e, "tool call failed");
                    e.to_payload()
                }
            };
            debug!(tool = %call.function.name, call_id = %call.id, bytes = content.len(), "tool result recorded");
            observer.on_tool_result(call, &content);
            session.add_message(Message::tool_result(&call.id, &call.function.name, content));
            outcomes.push(ToolOutcome {
                call: call.clone(),
                result,
            });
        }
        outcomes
    }

    async fn ask(&self, request: &ChatRequest) -> Result<Message, AgentError> {
        let reply = timeout(self.opts.step_timeout, self.llm.complete(request))
            .await
            .map_err(|_| {
                AgentError::ServiceUnavailable(anyhow::anyhow!(
                    "no reply within {:?}",
                    self.opts.step_timeout
                ))
            })?
            .map_err(AgentError::ServiceUnavailable)?;

        let has_text = reply
            .content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if !has_text && reply.requested_tools().is_empty() {
            return Err(AgentError::ServiceUnavailable(anyhow::anyhow!(
                "reply carried neither text nor tool calls"
            )));
        }
        Ok(reply)
    }
}
