// Log tools: search and service discovery

use super::{require_payload, text_response, HandlerMap, ToolDescriptor, ToolGroup, ToolHandler};
use crate::error::ToolResult;
use crate::protocol::CallToolResult;
use crate::schema::{FieldSpec, Schema, ToolArguments};
use coralogix_sdk::api::{LogSearch, LogsApi, ServicesResponse};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub const GET_LOGS: &str = "get_logs";
pub const GET_ALL_SERVICES: &str = "get_all_services";

const NO_LOGS: &str = "No logs data returned";

pub fn group() -> ToolResult<ToolGroup> {
    let get_logs = ToolDescriptor::build(
        Schema::new()
            .field("query", FieldSpec::string("Coralogix logs query string"))
            .field("from", FieldSpec::number("Start time in epoch seconds"))
            .field("to", FieldSpec::number("End time in epoch seconds"))
            .field(
                "limit",
                FieldSpec::integer("Maximum number of logs to return").with_default(100),
            ),
        GET_LOGS,
        "Search and retrieve logs from Coralogix",
    )?;

    let get_all_services = ToolDescriptor::build(
        Schema::new()
            .field(
                "query",
                FieldSpec::string("Coralogix logs query string").with_default("*"),
            )
            .field("from", FieldSpec::number("Start time in epoch seconds"))
            .field("to", FieldSpec::number("End time in epoch seconds"))
            .field(
                "limit",
                FieldSpec::integer("Maximum number of logs to return for service extraction")
                    .with_default(1000),
            ),
        GET_ALL_SERVICES,
        "Extract all unique service names from logs in Coralogix",
    )?;

    Ok(ToolGroup::new("logs", vec![get_logs, get_all_services]))
}

pub fn handlers(api: LogsApi) -> HandlerMap {
    let mut map = HandlerMap::new();
    map.insert(GET_LOGS, Arc::new(GetLogs { api: api.clone() }) as Arc<dyn ToolHandler>);
    map.insert(GET_ALL_SERVICES, Arc::new(GetAllServices { api }) as Arc<dyn ToolHandler>);
    map
}

/// Arguments shared by both log tools.
#[derive(Debug, Deserialize)]
struct LogWindowArgs {
    query: String,
    from: f64,
    to: f64,
    limit: u32,
}

impl From<LogWindowArgs> for LogSearch {
    fn from(args: LogWindowArgs) -> Self {
        LogSearch {
            query: args.query,
            from: args.from,
            to: args.to,
            limit: Some(args.limit),
        }
    }
}

struct GetLogs {
    api: LogsApi,
}

#[async_trait::async_trait]
impl ToolHandler for GetLogs {
    async fn call(&self, arguments: ToolArguments) -> ToolResult<CallToolResult> {
        let args: LogWindowArgs = arguments.parse()?;

        let response = self.api.search(&args.into()).await?;
        let logs = require_payload(response.logs, NO_LOGS)?;
        Ok(text_response("Logs data: ", &logs))
    }
}

struct GetAllServices {
    api: LogsApi,
}

impl GetAllServices {
    /// Dedicated services endpoint. `None` means fall back to log extraction.
    async fn listed_services(&self) -> Option<Vec<String>> {
        match self.api.services().await {
            Ok(ServicesResponse {
                services: Some(mut services),
            }) if !services.is_empty() => {
                services.sort();
                Some(services)
            }
            Ok(_) => {
                debug!("Services endpoint returned no services, extracting from logs");
                None
            }
            Err(e) => {
                warn!(error = %e, "Services endpoint failed, extracting from logs");
                None
            }
        }
    }

    async fn services_from_logs(&self, search: LogSearch) -> ToolResult<Vec<String>> {
        let response = self.api.search(&search).await?;
        let logs = require_payload(response.logs, NO_LOGS)?;
        Ok(extract_services(&logs).into_iter().collect())
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetAllServices {
    async fn call(&self, arguments: ToolArguments) -> ToolResult<CallToolResult> {
        let args: LogWindowArgs = arguments.parse()?;

        let services = match self.listed_services().await {
            Some(services) => services,
            None => self.services_from_logs(args.into()).await?,
        };

        Ok(text_response("Services: ", &Value::from(services)))
    }
}

/// Unique service names across log records, sorted.
///
/// A record contributes its `service` field, or `attributes.service` when the
/// top-level value is missing, empty or not a string.
fn extract_services(logs: &Value) -> BTreeSet<String> {
    let Some(records) = logs.as_array() else {
        debug!("Logs payload is not an array, no services extracted");
        return BTreeSet::new();
    };

    let mut services = BTreeSet::new();
    for record in records {
        match service_name(record) {
            Some(name) => {
                services.insert(name.to_string());
            }
            None => debug!(record = %record, "Log record has no usable service name"),
        }
    }
    services
}

fn service_name(record: &Value) -> Option<&str> {
    non_empty_str(record.get("service"))
        .or_else(|| non_empty_str(record.get("attributes").and_then(|a| a.get("service"))))
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
