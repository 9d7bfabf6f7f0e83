use std::io::Write;

use crate::agent::{Agent, TurnObserver};
use crate::session::Session;
use crate::types::ToolCall;

pub const WEATHER_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that provides weather information.";

/// Single question, single answer. The agent is expected to carry no tools.
pub async fn simple_chat<W: Write>(
    agent: &Agent,
    session: &mut Session,
    prompt: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    let outcome = agent.handle_turn(session, prompt).await?;
    writeln!(
        out,
        "Assistant: {}",
        outcome.display_text.as_deref().unwrap_or_default()
    )?;
    Ok(())
}

/// Narrates the weather round trip step by step.
struct WeatherSteps<'a, W: Write> {
    out: &'a mut W,
}

impl<W: Write> TurnObserver for WeatherSteps<'_, W> {
    fn on_tool_requests(&mut self, _calls: &[ToolCall]) {
        let _ = writeln!(self.out, "--- Step 2: LLM wants to call a tool ---");
    }

    fn on_tool_call(&mut self, call: &ToolCall) {
        let _ = writeln!(
            self.out,
            "--- ---- -- Tool call detected: {} with arguments {}",
            call.function.name, call.function.arguments
        );
    }

    fn on_tool_result(&mut self, _call: &ToolCall, content: &str) {
        let _ = writeln!(self.out, "--- Step 3: Sending tool result back to LLM ---");
        let _ = writeln!(self.out, "--- ---- -- Result being sent: {}", content);
    }
}

pub async fn weather_round_trip<W: Write>(
    agent: &Agent,
    session: &mut Session,
    question: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    writeln!(out, "--- Step 1: Calling the model with the user's request ---")?;
    let outcome = {
        let mut steps = WeatherSteps { out: &mut *out };
        agent.handle_turn_observed(session, question, &mut steps).await?
    };

    let answer = outcome.display_text.as_deref().unwrap_or_default();
    if outcome.used_tools() {
        writeln!(out, "--- Step 4: Final answer from LLM ---")?;
        writeln!(out, "--- ---- -- Assistant: {}", answer)?;
    } else {
        writeln!(out)?;
        writeln!(out, "The LLM did not call a tool, it just replied:")?;
        writeln!(out, "{}", answer)?;
    }
    Ok(())
}
