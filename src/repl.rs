use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

use crate::agent::{Agent, TurnObserver};
use crate::error::AgentError;
use crate::session::Session;
use crate::types::ToolCall;

pub const SUPPORT_SYSTEM_PROMPT: &str = "You are a 'Tier 1' technical support agent. Your name is 'SupportBot'. \
First, *always* check 'check_system_status' when a user reports a new problem. \
If the system is down, inform the user. Do not try to solve it. \
If the system is operational, *then* 'search_knowledge_base' for a solution. \
If you find a relevant article, provide it. \
If you cannot find a solution, *then* 'create_support_ticket'. \
You must ask for the user's name *before* creating a ticket. \
Be polite and helpful.";

const QUIT: &str = "quit";

/// How a support session finished.
#[derive(Debug)]
pub enum SessionEnd {
    /// The user typed the quit sentinel.
    Quit,
    /// Input closed before the user quit.
    EndOfInput,
    /// The chat service failed; the session cannot continue.
    Aborted(AgentError),
}

/// Prints tool activity between the user's line and SupportBot's answer.
struct SupportConsole<'a, W: Write> {
    out: &'a mut W,
}

impl<W: Write> TurnObserver for SupportConsole<'_, W> {
    fn on_tool_requests(&mut self, _calls: &[ToolCall]) {
        let _ = writeln!(self.out, "--- LLM decided to use a tool ---");
    }

    fn on_tool_call(&mut self, call: &ToolCall) {
        let _ = writeln!(
            self.out,
            "--- Calling: {}({}) ---",
            call.function.name, call.function.arguments
        );
    }

    fn on_resubmit(&mut self) {
        let _ = writeln!(self.out, "--- Sending tool results back to LLM... ---");
    }
}

/// Reads user lines until `quit`, end of input, or a service failure.
/// Blank lines are ignored.
pub async fn run_support_session<R, W>(
    agent: &Agent,
    session: &mut Session,
    input: R,
    out: &mut W,
) -> anyhow::Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "--- SupportBot is ready. Type 'quit' to exit. ---")?;
    writeln!(out, "SupportBot: Hello! I'm SupportBot. How can I help you today?")?;

    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            info!(session_id = %session.id, "input closed");
            return Ok(SessionEnd::EndOfInput);
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case(QUIT) {
            info!(session_id = %session.id, messages = session.len(), "user quit");
            return Ok(SessionEnd::Quit);
        }
        if line.is_empty() {
            continue;
        }

        let turn = {
            let mut console = SupportConsole { out: &mut *out };
            agent.handle_turn_observed(session, line, &mut console).await
        };

        match turn {
            Ok(outcome) => {
                for e in outcome.tool_errors() {
                    writeln!(out, "--- Tool error: {} ---", e)?;
                }
                let reply = outcome.display_text.as_deref().unwrap_or("(no reply)");
                writeln!(out, "SupportBot: {}", reply)?;
            }
            Err(e @ AgentError::ServiceUnavailable(_)) => {
                error!(session_id = %session.id, error = %e, "ending session");
                writeln!(out, "An error occurred: {}", e)?;
                return Ok(SessionEnd::Aborted(e));
            }
        }
    }
}
