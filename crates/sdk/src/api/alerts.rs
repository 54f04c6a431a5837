//! Alerts API endpoints.

use crate::error::SdkResult;
use crate::transport::HttpTransport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ALERTS_PATH: &str = "/api/v1/alerts";

/// Alerts API for listing and inspecting alert definitions.
#[derive(Debug, Clone)]
pub struct AlertsApi {
    http: HttpTransport,
}

impl AlertsApi {
    pub(crate) fn new(http: HttpTransport) -> Self {
        Self { http }
    }

    /// List alerts matching the filter.
    pub async fn list(&self, filter: &AlertFilter) -> SdkResult<AlertsResponse> {
        let body: Option<AlertsResponse> = self.http.get_with_query(ALERTS_PATH, filter).await?;
        Ok(body.unwrap_or_default())
    }

    /// Get a single alert. `None` when the API answers with an empty body.
    pub async fn get(&self, alert_id: &str) -> SdkResult<Option<Value>> {
        self.http.get_resource(ALERTS_PATH, alert_id).await
    }
}

/// Query parameters for listing alerts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Response of the alert listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsResponse {
    #[serde(default)]
    pub alerts: Option<Value>,
}
