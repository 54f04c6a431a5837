// Metric tools

use super::{require_payload, text_response, HandlerMap, ToolDescriptor, ToolGroup, ToolHandler};
use crate::error::ToolResult;
use crate::protocol::CallToolResult;
use crate::schema::{FieldSpec, Schema, ToolArguments};
use coralogix_sdk::api::{MetricsApi, MetricsQuery};
use std::sync::Arc;

pub const QUERY_METRICS: &str = "query_metrics";

pub fn group() -> ToolResult<ToolGroup> {
    let query_metrics = ToolDescriptor::build(
        Schema::new()
            .field("query", FieldSpec::string("Coralogix metrics query string"))
            .field("from", FieldSpec::number("Start time in epoch seconds"))
            .field("to", FieldSpec::number("End time in epoch seconds")),
        QUERY_METRICS,
        "Retrieve metrics data from Coralogix",
    )?;

    Ok(ToolGroup::new("metrics", vec![query_metrics]))
}

pub fn handlers(api: MetricsApi) -> HandlerMap {
    let mut map = HandlerMap::new();
    map.insert(QUERY_METRICS, Arc::new(QueryMetrics { api }) as Arc<dyn ToolHandler>);
    map
}

struct QueryMetrics {
    api: MetricsApi,
}

#[async_trait::async_trait]
impl ToolHandler for QueryMetrics {
    async fn call(&self, arguments: ToolArguments) -> ToolResult<CallToolResult> {
        // Validated fields line up with the accessor's query type.
        let query: MetricsQuery = arguments.parse()?;

        let data = self.api.query(&query).await?;
        let data = require_payload(data, "No metrics data returned")?;
        Ok(text_response("Metrics data: ", &data))
    }
}
