//! Validated dispatch from tool name to handler.

use crate::error::{ToolError, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{HandlerMap, ToolRegistry};
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;
use tracing::{debug, error};

/// Routes invocations to handlers. Holds only immutable state, so it is
/// shared across request tasks behind an `Arc` without locking.
pub struct Dispatcher {
    registry: ToolRegistry,
    handlers: HandlerMap,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tools: Vec<&str> = self.handlers.keys().copied().collect();
        tools.sort_unstable();
        f.debug_struct("Dispatcher")
            .field("tools", &tools)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Pair a registry with its handlers. Every descriptor needs exactly one
    /// handler and every handler needs a descriptor.
    pub fn new(registry: ToolRegistry, handlers: HandlerMap) -> ToolResult<Self> {
        if let Some(missing) = registry
            .list()
            .iter()
            .find(|d| !handlers.contains_key(d.name()))
        {
            return Err(ToolError::configuration(format!(
                "no handler registered for tool '{}'",
                missing.name()
            )));
        }

        let mut orphans: Vec<&str> = handlers
            .keys()
            .copied()
            .filter(|name| !registry.contains(name))
            .collect();
        if !orphans.is_empty() {
            orphans.sort();
            return Err(ToolError::configuration(format!(
                "handlers without a tool descriptor: {}",
                orphans.join(", ")
            )));
        }

        Ok(Self { registry, handlers })
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Wire schemas for `tools/list`, in registry order.
    pub fn list_tools(&self) -> Vec<ToolSchema> {
        self.registry.list_schemas()
    }

    /// Validate and invoke. Failures are logged once here and returned as-is.
    pub async fn call(&self, name: &str, arguments: Value) -> ToolResult<CallToolResult> {
        let result = self.dispatch(name, &arguments).await;

        if let Err(e) = &result {
            error!(
                tool = name,
                arguments = %arguments,
                kind = e.kind(),
                error = %e,
                sources = ?error_chain(e),
                "Tool invocation failed"
            );
        }

        result
    }

    async fn dispatch(&self, name: &str, arguments: &Value) -> ToolResult<CallToolResult> {
        let (Some(descriptor), Some(handler)) = (self.registry.get(name), self.handlers.get(name))
        else {
            return Err(ToolError::UnknownTool(name.to_string()));
        };

        let validated = descriptor.schema().validate(arguments.clone())?;
        debug!(tool = name, "Dispatching tool call");
        handler.call(validated).await
    }
}

fn error_chain(err: &ToolError) -> Vec<String> {
    let mut chain = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}
