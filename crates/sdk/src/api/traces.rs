//! Traces API endpoints.

use super::{TimeRangeBody, DEFAULT_SEARCH_LIMIT};
use crate::error::SdkResult;
use crate::transport::HttpTransport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Traces API for span search.
#[derive(Debug, Clone)]
pub struct TracesApi {
    http: HttpTransport,
}

impl TracesApi {
    pub(crate) fn new(http: HttpTransport) -> Self {
        Self { http }
    }

    /// Search traces in a time window.
    pub async fn search(&self, search: &TraceSearch) -> SdkResult<TracesResponse> {
        let body = TimeRangeBody::from_seconds(
            &search.query,
            search.from,
            search.to,
            Some(search.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
        );
        let response: Option<TracesResponse> =
            self.http.post("/api/v1/traces/search", &body).await?;
        Ok(response.unwrap_or_default())
    }
}

/// Trace search parameters. Bounds are epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSearch {
    pub query: String,
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Response of the trace search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracesResponse {
    #[serde(default)]
    pub traces: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoralogixClient, SdkError};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_surfaces_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/traces/search"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"message": "Internal server error"})),
            )
            .mount(&server)
            .await;

        let client = CoralogixClient::builder()
            .api_key("test-api-key")
            .base_url(server.uri())
            .build()
            .unwrap();

        let err = client
            .traces()
            .search(&TraceSearch {
                query: "*".to_string(),
                from: 1.0,
                to: 2.0,
                limit: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::Api { status: 500, .. }));
        assert!(err.to_string().contains("Internal server error"));
    }
}
