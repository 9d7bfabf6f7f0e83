pub use self::knowledge_base::KnowledgeBase;
#[cfg(test)]
pub use self::knowledge_base::Article;
pub use self::support_ticket::SupportDesk;
#[cfg(test)]
pub use self::support_ticket::ticket_id;
pub use self::system_status::CheckSystemStatus;
pub use self::weather::CurrentWeather;

mod knowledge_base;
mod support_ticket;
pub mod system_status;
mod weather;

use crate::tool_registry::ToolRegistry;

/// Tools available to SupportBot, in the order they are advertised.
pub fn support_registry(desk: SupportDesk) -> anyhow::Result<ToolRegistry> {
    ToolRegistry::new()
        .with_tool(CheckSystemStatus::new())?
        .with_tool(KnowledgeBase::new())?
        .with_tool(desk)
}

pub fn weather_registry() -> anyhow::Result<ToolRegistry> {
    ToolRegistry::new().with_tool(CurrentWeather)
}
