use crate::error::ToolError;
use crate::tool_registry::{Tool, ToolHandler, ToolRegistry, Typed, in_handler_scope};
use crate::tools::system_status::{OPERATIONAL, OUTAGE};
use crate::tools::{
    self, Article, CheckSystemStatus, CurrentWeather, KnowledgeBase, SupportDesk,
};
use crate::types::ToolCall;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn invoke<T: Tool>(tool: T, arguments: &str) -> Result<Value, ToolError> {
    let raw = Typed(tool).invoke(arguments)?;
    Ok(serde_json::from_str(&raw).unwrap())
}

#[test]
fn test_weather_echoes_location_and_unit() {
    let out = invoke(CurrentWeather, r#"{"location": "Boston, MA", "unit": "celsius"}"#).unwrap();
    assert_eq!(
        out,
        json!({"location": "Boston, MA", "temperature": "30", "unit": "celsius", "forecast": "sunny"})
    );
}

#[test]
fn test_weather_unit_is_optional() {
    let out = invoke(CurrentWeather, r#"{"location": "Tokyo"}"#).unwrap();
    assert_eq!(out["unit"], Value::Null);
    assert_eq!(out["forecast"], "sunny");
}

#[test]
fn test_weather_requires_location() {
    let err = invoke(CurrentWeather, r#"{"unit": "celsius"}"#).unwrap_err();
    match err {
        ToolError::MalformedArguments { tool, reason } => {
            assert_eq!(tool, "get_current_weather");
            assert!(reason.contains("location"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_system_status_extremes() {
    for args in ["", "{}", "  "] {
        let up = invoke(CheckSystemStatus::with_outage_probability(0.0), args).unwrap();
        assert_eq!(up, json!({ "status": OPERATIONAL }));
    }
    let down = invoke(CheckSystemStatus::with_outage_probability(1.0), "{}").unwrap();
    assert_eq!(down, json!({ "status": OUTAGE }));
}

#[test]
fn test_knowledge_base_keyword_match() {
    let kb = KnowledgeBase::new();

    let hits = kb.search("I have a LOGIN ISSUE since this morning");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].article_id, "KB-001");

    let both = kb.search("login issue and a slow connection");
    let ids: Vec<&str> = both.iter().map(|a| a.article_id.as_str()).collect();
    assert_eq!(ids, vec!["KB-001", "KB-002"]);
}

#[test]
fn test_knowledge_base_no_match_is_not_an_error() {
    let out = invoke(KnowledgeBase::new(), r#"{"query_string": "my cat ate the mouse"}"#).unwrap();
    assert_eq!(out, json!([]));
}

#[test]
fn test_knowledge_base_custom_articles() {
    let kb = KnowledgeBase::from_articles([(
        "VPN",
        Article {
            article_id: "KB-100".to_string(),
            title: "VPN drops".to_string(),
            solution: "Reinstall the client.".to_string(),
        },
    )]);
    assert_eq!(kb.search("my vpn keeps dropping").len(), 1);
}

#[test]
fn test_ticket_creation_is_recorded() {
    let desk = SupportDesk::new();
    let out = invoke(
        desk.clone(),
        r#"{"user_name": "Ada Lovelace", "problem_description": "Engine will not start"}"#,
    )
    .unwrap();

    let expected_id = tools::ticket_id("Ada Lovelace", "Engine will not start");
    assert_eq!(out["ticket_id"], expected_id.as_str());
    assert_eq!(out["user_name"], "Ada Lovelace");
    assert_eq!(out["problem"], "Engine will not start");
    assert_eq!(out["status"], "Open");

    let tickets = desk.tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].ticket_id, expected_id);

    let n: u64 = expected_id.trim_start_matches("TICKET-").parse().unwrap();
    assert!(n <= 0xffff);
}

#[test]
fn test_ticket_requires_both_fields() {
    let desk = SupportDesk::new();
    let err = invoke(desk.clone(), r#"{"user_name": "Ada"}"#).unwrap_err();
    assert!(matches!(err, ToolError::MalformedArguments { .. }));
    assert!(desk.tickets().is_empty());
}

#[test]
fn test_support_registry_catalog() {
    let registry = tools::support_registry(SupportDesk::new()).unwrap();
    let names: Vec<String> = registry.catalog().into_iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![
            "check_system_status",
            "search_knowledge_base",
            "create_support_ticket"
        ]
    );

    let schemas = registry.schemas();
    assert_eq!(schemas[1]["type"], "function");
    assert_eq!(schemas[1]["function"]["name"], "search_knowledge_base");
    assert_eq!(
        schemas[1]["function"]["parameters"]["required"],
        json!(["query_string"])
    );
    // Same registry, same catalog.
    assert_eq!(registry.schemas(), schemas);
    assert_eq!(registry.clone().schemas(), schemas);
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let err = ToolRegistry::new()
        .with_tool(CurrentWeather)
        .unwrap()
        .with_tool(CurrentWeather)
        .err()
        .unwrap();
    assert!(err.to_string().contains("already registered"));
}

#[test]
fn test_dispatch_unknown_tool() {
    let registry = tools::weather_registry().unwrap();
    assert!(registry.contains("get_current_weather"));
    assert!(!registry.contains("delete_everything"));
    assert_eq!(registry.len(), 1);

    let err = registry
        .dispatch(&ToolCall::new("x", "delete_everything", "{}"))
        .unwrap_err();
    assert_eq!(
        err,
        ToolError::UnknownTool {
            name: "delete_everything".to_string()
        }
    );
}

struct Failing;

impl Tool for Failing {
    const NAME: &'static str = "failing";
    const DESCRIPTION: &'static str = "Always fails";

    type Args = Value;
    type Output = Value;

    fn parameters(&self) -> Value {
        json!({ "type": "object" })
    }

    fn call(&self, _args: Value) -> anyhow::Result<Value> {
        anyhow::bail!("database offline")
    }
}

#[test]
fn test_handler_error_becomes_fault() {
    let registry = ToolRegistry::new().with_tool(Failing).unwrap();
    let err = registry
        .dispatch(&ToolCall::new("f", "failing", "{}"))
        .unwrap_err();
    assert_eq!(
        err,
        ToolError::HandlerFault {
            tool: "failing".to_string(),
            reason: "database offline".to_string()
        }
    );
}

struct Panicking;

impl Tool for Panicking {
    const NAME: &'static str = "panicking";
    const DESCRIPTION: &'static str = "Always panics";

    type Args = Value;
    type Output = Value;

    fn parameters(&self) -> Value {
        json!({ "type": "object" })
    }

    fn call(&self, _args: Value) -> anyhow::Result<Value> {
        panic!("index out of range")
    }
}

#[test]
fn test_handler_panic_is_contained_and_scope_closed() {
    let registry = ToolRegistry::new().with_tool(Panicking).unwrap();
    assert!(!in_handler_scope());

    for _ in 0..2 {
        let err = registry
            .dispatch(&ToolCall::new("p", "panicking", "{}"))
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::HandlerFault {
                tool: "panicking".to_string(),
                reason: "index out of range".to_string()
            }
        );
        assert!(!in_handler_scope());
    }

    // Panics outside a handler still unwind as usual.
    let outside = std::panic::catch_unwind(|| panic!("not a tool"));
    assert!(outside.is_err());
}
