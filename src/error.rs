use serde_json::json;
use thiserror::Error;

/// Errors `Agent::handle_turn` hands back to the session loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The chat service could not be reached, timed out, or answered with
    /// something that is not an assistant message.
    #[error("chat service unavailable: {0:#}")]
    ServiceUnavailable(anyhow::Error),
}

/// Failures while resolving a single tool invocation. These never abort a
/// turn: they are rendered into the tool-result message instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("malformed arguments for '{tool}': {reason}")]
    MalformedArguments { tool: String, reason: String },

    #[error("unknown tool '{name}'")]
    UnknownTool { name: String },

    #[error("tool '{tool}' failed: {reason}")]
    HandlerFault { tool: String, reason: String },
}

impl ToolError {
    /// JSON body stored as the tool-result content.
    pub fn to_payload(&self) -> String {
        let body = match self {
            ToolError::UnknownTool { .. } => json!({ "error": "Unknown function" }),
            ToolError::MalformedArguments { reason, .. } => json!({
                "error": "Malformed arguments",
                "detail": reason,
            }),
            ToolError::HandlerFault { reason, .. } => json!({
                "error": "Tool execution failed",
                "detail": reason,
            }),
        };
        body.to_string()
    }
}
