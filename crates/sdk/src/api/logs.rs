//! Logs API endpoints.

use super::{TimeRangeBody, DEFAULT_SEARCH_LIMIT};
use crate::error::SdkResult;
use crate::transport::HttpTransport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logs API for log search and service discovery.
#[derive(Debug, Clone)]
pub struct LogsApi {
    http: HttpTransport,
}

impl LogsApi {
    pub(crate) fn new(http: HttpTransport) -> Self {
        Self { http }
    }

    /// Search logs in a time window.
    pub async fn search(&self, search: &LogSearch) -> SdkResult<LogsResponse> {
        let body = TimeRangeBody::from_seconds(
            &search.query,
            search.from,
            search.to,
            Some(search.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
        );
        let response: Option<LogsResponse> = self.http.post("/api/v1/logs/search", &body).await?;
        Ok(response.unwrap_or_default())
    }

    /// List the services known to the account.
    pub async fn services(&self) -> SdkResult<ServicesResponse> {
        let response: Option<ServicesResponse> = self.http.get("/api/v1/services").await?;
        Ok(response.unwrap_or_default())
    }
}

/// Log search parameters. Bounds are epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSearch {
    pub query: String,
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Response of the log search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Option<Value>,
}

/// Response of the services endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesResponse {
    #[serde(default)]
    pub services: Option<Vec<String>>,
}
