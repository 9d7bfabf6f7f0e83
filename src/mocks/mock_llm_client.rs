use crate::agent::ChatService;
use crate::llm_client::ChatRequest;
use crate::types::{Message, ToolCall};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted chat service. Replies are handed out in the order they were
/// added; every request is recorded. Clones share the script and history.
#[derive(Clone, Default)]
pub struct MockLlmClient {
    responses: Arc<Mutex<VecDeque<Result<Message, String>>>>,
    call_history: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text_response(&self, content: &str) {
        self.push(Ok(Message::assistant(content)));
    }

    pub fn add_tool_call_response(&self, id: &str, tool_name: &str, args: &str) {
        self.add_tool_calls_response(vec![ToolCall::new(id, tool_name, args)]);
    }

    pub fn add_tool_calls_response(&self, calls: Vec<ToolCall>) {
        self.push(Ok(Message::assistant_tool_calls(calls)));
    }

    pub fn add_raw_response(&self, message: Message) {
        self.push(Ok(message));
    }

    /// The next call fails as if the transport broke.
    pub fn add_error_response(&self, error_msg: &str) {
        self.push(Err(error_msg.to_string()));
    }

    pub fn get_call_history(&self) -> Vec<ChatRequest> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    fn push(&self, response: Result<Message, String>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl ChatService for MockLlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Message> {
        self.call_history.lock().unwrap().push(request.clone());

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(message)) => Ok(message),
            Some(Err(e)) => Err(anyhow::anyhow!(e)),
            None => Err(anyhow::anyhow!("No mock response available")),
        }
    }
}
