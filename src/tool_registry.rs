use std::cell::Cell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Once};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::types::{ToolCall, ToolDescriptor};

/// A local capability the model can ask for by name.
pub trait ToolHandler: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    /// Runs the tool on the raw argument text and returns the serialized
    /// result.
    fn invoke(&self, arguments: &str) -> Result<String, ToolError>;
}

/// Strongly typed tool. Wrap it with [`Typed`] (or register it through
/// [`ToolRegistry::with_tool`]) to get a [`ToolHandler`].
pub trait Tool: Send + Sync {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    type Args: DeserializeOwned;
    type Output: Serialize;

    /// JSON schema of `Args`, advertised to the model.
    fn parameters(&self) -> Value;

    fn call(&self, args: Self::Args) -> anyhow::Result<Self::Output>;
}

pub struct Typed<T>(pub T);

impl<T: Tool> ToolHandler for Typed<T> {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(T::NAME, T::DESCRIPTION, self.0.parameters())
    }

    fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
        let args: T::Args = decode_arguments(T::NAME, arguments)?;
        let output = self.0.call(args).map_err(|e| ToolError::HandlerFault {
            tool: T::NAME.to_string(),
            reason: format!("{:#}", e),
        })?;
        serde_json::to_string(&output).map_err(|e| ToolError::HandlerFault {
            tool: T::NAME.to_string(),
            reason: format!("failed to serialize result: {}", e),
        })
    }
}

/// Parses the model-supplied argument text into the tool's argument type.
/// Blank text counts as an empty object, which is what models send for
/// tools without parameters.
pub fn decode_arguments<A: DeserializeOwned>(tool: &str, raw: &str) -> Result<A, ToolError> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).map_err(|e| ToolError::MalformedArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Clone)]
struct Entry {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

/// Name-indexed set of tools, built once at startup.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool<T: Tool + 'static>(self, tool: T) -> anyhow::Result<Self> {
        self.with_handler(Arc::new(Typed(tool)))
    }

    pub fn with_handler(mut self, handler: Arc<dyn ToolHandler>) -> anyhow::Result<Self> {
        let descriptor = handler.descriptor();
        if self.index.contains_key(&descriptor.name) {
            anyhow::bail!("tool '{}' is already registered", descriptor.name);
        }
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(Entry {
            descriptor,
            handler,
        });
        Ok(self)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in registration order.
    #[cfg(test)]
    pub fn catalog(&self) -> Vec<ToolDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    /// The `tools` array the chat service sees.
    pub fn schemas(&self) -> Value {
        Value::Array(
            self.entries
                .iter()
                .map(|e| e.descriptor.to_function_spec())
                .collect(),
        )
    }

    /// Resolves one invocation. Panics inside a handler are reported as a
    /// `HandlerFault` rather than unwinding through the orchestrator.
    pub fn dispatch(&self, call: &ToolCall) -> Result<String, ToolError> {
        let name = call.function.name.as_str();
        let Some(&slot) = self.index.get(name) else {
            warn!(tool = name, call_id = %call.id, "model requested an unregistered tool");
            return Err(ToolError::UnknownTool {
                name: name.to_string(),
            });
        };
        let handler = &self.entries[slot].handler;
        debug!(tool = name, call_id = %call.id, arguments = %call.function.arguments, "invoking tool");

        let caught = {
            let _guard = HandlerScope::enter();
            catch_unwind(AssertUnwindSafe(|| handler.invoke(&call.function.arguments)))
        };
        match caught {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                Err(ToolError::HandlerFault {
                    tool: name.to_string(),
                    reason,
                })
            }
        }
    }
}

thread_local! {
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

static QUIET_PANICS: Once = Once::new();

/// Marks the current thread as running a tool handler. Panics raised while
/// a scope is open are logged at debug level instead of going through the
/// default hook, which would print over the console.
struct HandlerScope;

impl HandlerScope {
    fn enter() -> Self {
        QUIET_PANICS.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if IN_HANDLER.with(Cell::get) {
                    debug!(%info, "tool handler panicked");
                } else {
                    previous(info);
                }
            }));
        });
        IN_HANDLER.with(|flag| flag.set(true));
        HandlerScope
    }
}

impl Drop for HandlerScope {
    fn drop(&mut self) {
        IN_HANDLER.with(|flag| flag.set(false));
    }
}

#[cfg(test)]
pub(crate) fn in_handler_scope() -> bool {
    IN_HANDLER.with(Cell::get)
}
