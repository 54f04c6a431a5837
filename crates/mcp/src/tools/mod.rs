// Tool descriptors, groups and handler wiring

pub mod alerts;
pub mod logs;
pub mod metrics;
pub mod traces;
mod registry;

pub use registry::ToolRegistry;

use crate::error::{ToolError, ToolResult};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::schema::{Schema, ToolArguments};
use coralogix_sdk::CoralogixClient;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A named, described tool with its argument schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    schema: Schema,
    input_schema: Value,
}

impl ToolDescriptor {
    /// Combine a schema, a name and a description into a descriptor.
    ///
    /// Fails with [`ToolError::Configuration`] on an empty name or
    /// description, or on a schema that does not check out.
    pub fn build(schema: Schema, name: &str, description: &str) -> ToolResult<Self> {
        if name.trim().is_empty() {
            return Err(ToolError::configuration("tool name cannot be empty"));
        }
        if description.trim().is_empty() {
            return Err(ToolError::configuration(format!(
                "tool '{}' has no description",
                name
            )));
        }
        schema
            .check()
            .map_err(|e| ToolError::configuration(format!("tool '{}': {}", name, e)))?;

        let input_schema = schema.to_json_schema();
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            schema,
            input_schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Wire form advertised by `tools/list`.
    pub fn to_schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Descriptors contributed by one upstream area.
#[derive(Debug, Clone)]
pub struct ToolGroup {
    name: &'static str,
    tools: Vec<ToolDescriptor>,
}

impl ToolGroup {
    pub fn new(name: &'static str, tools: Vec<ToolDescriptor>) -> Self {
        Self { name, tools }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn into_tools(self) -> Vec<ToolDescriptor> {
        self.tools
    }
}

/// Async body of one tool. Only ever sees validated arguments.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: ToolArguments) -> ToolResult<CallToolResult>;
}

/// Tool name to handler.
pub type HandlerMap = HashMap<&'static str, Arc<dyn ToolHandler>>;

/// The production catalog: alerts, logs, metrics, traces.
pub fn catalog() -> ToolResult<ToolRegistry> {
    ToolRegistry::build(vec![
        alerts::group()?,
        logs::group()?,
        metrics::group()?,
        traces::group()?,
    ])
}

/// Handlers for every group in [`catalog`], bound to `client`.
pub fn handlers(client: &CoralogixClient) -> ToolResult<HandlerMap> {
    let groups = [
        alerts::handlers(client.alerts()),
        logs::handlers(client.logs()),
        metrics::handlers(client.metrics()),
        traces::handlers(client.traces()),
    ];

    let mut merged = HandlerMap::new();
    for group in groups {
        for (name, handler) in group {
            if merged.insert(name, handler).is_some() {
                return Err(ToolError::configuration(format!(
                    "duplicate handler for tool '{}'",
                    name
                )));
            }
        }
    }
    Ok(merged)
}

/// Unwrap an upstream payload, treating `null` the same as absent.
pub(crate) fn require_payload(payload: Option<Value>, missing: &str) -> ToolResult<Value> {
    match payload {
        Some(Value::Null) | None => Err(ToolError::data_unavailable(missing)),
        Some(value) => Ok(value),
    }
}

/// `<prefix><compact JSON>` as a single text element.
pub(crate) fn text_response(prefix: &str, payload: &Value) -> CallToolResult {
    CallToolResult::text(format!("{}{}", prefix, payload))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::protocol::ToolContent;
    use wiremock::MockServer;

    pub fn client(server: &MockServer) -> CoralogixClient {
        CoralogixClient::builder()
            .api_key("test-api-key")
            .base_url(server.uri())
            .build()
            .unwrap()
    }

    /// Client pointed at an address nothing listens on. For wiring tests.
    pub fn offline_client() -> CoralogixClient {
        CoralogixClient::builder()
            .api_key("test-api-key")
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap()
    }

    pub fn validated(group: &ToolGroup, tool: &str, arguments: Value) -> ToolArguments {
        group
            .tools()
            .iter()
            .find(|d| d.name() == tool)
            .unwrap()
            .schema()
            .validate(arguments)
            .unwrap()
    }

    pub fn text(result: &CallToolResult) -> &str {
        assert_eq!(result.content.len(), 1);
        match &result.content[0] {
            ToolContent::Text { text } => text.as_str(),
        }
    }

    /// Handler keys and descriptor names must match one to one.
    pub fn assert_bijection(group: &ToolGroup, handlers: &HandlerMap) {
        let mut declared: Vec<&str> = group.tools().iter().map(|d| d.name()).collect();
        let mut bound: Vec<&str> = handlers.keys().copied().collect();
        declared.sort();
        bound.sort();
        assert_eq!(declared, bound, "group '{}'", group.name());
    }
}
