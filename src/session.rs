use chrono::Utc;
use uuid::Uuid;

use crate::types::Message;
pub use crate::types::Session;

impl Session {
    /// Starts a conversation whose history holds only the system prompt.
    pub fn new(system_prompt: &str, model: Option<&str>) -> Session {
        Session {
            id: Uuid::new_v4().to_string(),
            messages: vec![Message::system(system_prompt)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            model: model.map(|s| s.to_string()),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    // History is append-only; only the orchestrator adds to it.
    pub(crate) fn add_message(&mut self, msg: Message) {
        self.messages.push(msg);
        self.updated_at = Utc::now();
    }
}
