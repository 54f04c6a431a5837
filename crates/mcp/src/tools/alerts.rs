// Alert tools

use super::{require_payload, text_response, HandlerMap, ToolDescriptor, ToolGroup, ToolHandler};
use crate::error::ToolResult;
use crate::protocol::CallToolResult;
use crate::schema::{FieldSpec, Schema, ToolArguments};
use coralogix_sdk::api::{AlertFilter, AlertsApi};
use serde::Deserialize;
use std::sync::Arc;

pub const LIST_ALERTS: &str = "list_alerts";
pub const GET_ALERT: &str = "get_alert";

pub fn group() -> ToolResult<ToolGroup> {
    let list_alerts = ToolDescriptor::build(
        Schema::new()
            .field(
                "status",
                FieldSpec::string(r#"Filter alerts by status (e.g., "active", "resolved")"#).optional(),
            )
            .field(
                "severity",
                FieldSpec::string(r#"Filter alerts by severity (e.g., "critical", "warning", "info")"#)
                    .optional(),
            )
            .field(
                "limit",
                FieldSpec::integer("Maximum number of alerts to return").with_default(20),
            )
            .field("offset", FieldSpec::integer("Offset for pagination").with_default(0)),
        LIST_ALERTS,
        "Retrieve a list of alerts from Coralogix",
    )?;

    let get_alert = ToolDescriptor::build(
        Schema::new().field("alert_id", FieldSpec::string("ID of the alert to fetch")),
        GET_ALERT,
        "Retrieve detailed information about a specific Coralogix alert",
    )?;

    Ok(ToolGroup::new("alerts", vec![list_alerts, get_alert]))
}

pub fn handlers(api: AlertsApi) -> HandlerMap {
    let mut map = HandlerMap::new();
    map.insert(LIST_ALERTS, Arc::new(ListAlerts { api: api.clone() }) as Arc<dyn ToolHandler>);
    map.insert(GET_ALERT, Arc::new(GetAlert { api }) as Arc<dyn ToolHandler>);
    map
}

#[derive(Debug, Deserialize)]
struct ListAlertsArgs {
    status: Option<String>,
    severity: Option<String>,
    limit: u32,
    offset: u32,
}

struct ListAlerts {
    api: AlertsApi,
}

#[async_trait::async_trait]
impl ToolHandler for ListAlerts {
    async fn call(&self, arguments: ToolArguments) -> ToolResult<CallToolResult> {
        let args: ListAlertsArgs = arguments.parse()?;

        let response = self
            .api
            .list(&AlertFilter {
                status: args.status,
                severity: args.severity,
                limit: Some(args.limit),
                offset: Some(args.offset),
            })
            .await?;

        let alerts = require_payload(response.alerts, "No alerts data returned")?;
        Ok(text_response("Alerts: ", &alerts))
    }
}

#[derive(Debug, Deserialize)]
struct GetAlertArgs {
    alert_id: String,
}

struct GetAlert {
    api: AlertsApi,
}

#[async_trait::async_trait]
impl ToolHandler for GetAlert {
    async fn call(&self, arguments: ToolArguments) -> ToolResult<CallToolResult> {
        let args: GetAlertArgs = arguments.parse()?;

        let alert = self.api.get(&args.alert_id).await?;
        let alert = require_payload(alert, "No alert data returned")?;
        Ok(text_response("Alert details: ", &alert))
    }
}
