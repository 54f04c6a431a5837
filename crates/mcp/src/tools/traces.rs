// Trace tools

use super::{require_payload, text_response, HandlerMap, ToolDescriptor, ToolGroup, ToolHandler};
use crate::error::ToolResult;
use crate::protocol::CallToolResult;
use crate::schema::{FieldSpec, Schema, ToolArguments};
use coralogix_sdk::api::{TraceSearch, TracesApi};
use serde::Deserialize;
use std::sync::Arc;

pub const SEARCH_TRACES: &str = "search_traces";

pub fn group() -> ToolResult<ToolGroup> {
    let search_traces = ToolDescriptor::build(
        Schema::new()
            .field("query", FieldSpec::string("Coralogix trace query string"))
            .field("from", FieldSpec::number("Start time in epoch seconds"))
            .field("to", FieldSpec::number("End time in epoch seconds"))
            .field(
                "limit",
                FieldSpec::integer("Maximum number of traces to return").with_default(100),
            )
            .field("service", FieldSpec::string("Filter by service name").optional())
            .field("operation", FieldSpec::string("Filter by operation name").optional()),
        SEARCH_TRACES,
        "Search and retrieve traces from Coralogix",
    )?;

    Ok(ToolGroup::new("traces", vec![search_traces]))
}

pub fn handlers(api: TracesApi) -> HandlerMap {
    let mut map = HandlerMap::new();
    map.insert(SEARCH_TRACES, Arc::new(SearchTraces { api }) as Arc<dyn ToolHandler>);
    map
}

#[derive(Debug, Deserialize)]
struct SearchTracesArgs {
    query: String,
    from: f64,
    to: f64,
    limit: u32,
    service: Option<String>,
    operation: Option<String>,
}

impl SearchTracesArgs {
    /// Base query with ` service:<v>` and ` operation:<v>` appended when set.
    fn full_query(&self) -> String {
        let mut query = self.query.clone();
        if let Some(service) = self.service.as_deref().filter(|s| !s.is_empty()) {
            query.push_str(" service:");
            query.push_str(service);
        }
        if let Some(operation) = self.operation.as_deref().filter(|s| !s.is_empty()) {
            query.push_str(" operation:");
            query.push_str(operation);
        }
        query
    }
}

struct SearchTraces {
    api: TracesApi,
}

#[async_trait::async_trait]
impl ToolHandler for SearchTraces {
    async fn call(&self, arguments: ToolArguments) -> ToolResult<CallToolResult> {
        let args: SearchTracesArgs = arguments.parse()?;

        let response = self
            .api
            .search(&TraceSearch {
                query: args.full_query(),
                from: args.from,
                to: args.to,
                limit: Some(args.limit),
            })
            .await?;

        let traces = require_payload(response.traces, "No traces data returned")?;
        Ok(text_response("Traces: ", &traces))
    }
}
