use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::tool_registry::Tool;

#[derive(Deserialize, Debug)]
pub struct TicketArgs {
    pub user_name: String,
    pub problem_description: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Ticket {
    pub ticket_id: String,
    pub user_name: String,
    pub problem: String,
    pub status: String,
}

/// Files support tickets into an in-memory log. Clones share the log.
#[derive(Default, Clone)]
pub struct SupportDesk {
    opened: Arc<Mutex<Vec<Ticket>>>,
}

impl SupportDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets created so far, oldest first.
    #[cfg(test)]
    pub fn tickets(&self) -> Vec<Ticket> {
        self.opened
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

pub fn ticket_id(user_name: &str, problem_description: &str) -> String {
    let mut hasher = DefaultHasher::new();
    format!("{}{}", user_name, problem_description).hash(&mut hasher);
    format!("TICKET-{}", hasher.finish() & 0xffff)
}

impl Tool for SupportDesk {
    const NAME: &'static str = "create_support_ticket";
    const DESCRIPTION: &'static str =
        "Creates a new support ticket when a problem cannot be solved.";

    type Args = TicketArgs;
    type Output = Ticket;

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_name": {
                    "type": "string",
                    "description": "The user's full name"
                },
                "problem_description": {
                    "type": "string",
                    "description": "A detailed description of the problem"
                }
            },
            "required": ["user_name", "problem_description"]
        })
    }

    fn call(&self, args: TicketArgs) -> anyhow::Result<Ticket> {
        let ticket = Ticket {
            ticket_id: ticket_id(&args.user_name, &args.problem_description),
            user_name: args.user_name,
            problem: args.problem_description,
            status: "Open".to_string(),
        };
        self.opened
            .lock()
            .map_err(|_| anyhow::anyhow!("ticket log is poisoned"))?
            .push(ticket.clone());
        info!(ticket_id = %ticket.ticket_id, user = %ticket.user_name, "support ticket created");
        Ok(ticket)
    }
}
