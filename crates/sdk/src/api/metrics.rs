//! Metrics API endpoints.

use super::TimeRangeBody;
use crate::error::SdkResult;
use crate::transport::HttpTransport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metrics API for time-series queries.
#[derive(Debug, Clone)]
pub struct MetricsApi {
    http: HttpTransport,
}

impl MetricsApi {
    pub(crate) fn new(http: HttpTransport) -> Self {
        Self { http }
    }

    /// Run a metrics query. `None` when the API answers with an empty body.
    pub async fn query(&self, query: &MetricsQuery) -> SdkResult<Option<Value>> {
        let body = TimeRangeBody::from_seconds(&query.query, query.from, query.to, None);
        self.http.post("/api/v1/metrics/query", &body).await
    }
}

/// Metrics query parameters. Bounds are epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsQuery {
    pub query: String,
    pub from: f64,
    pub to: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoralogixClient;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_query_body_and_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics/query"))
            .and(body_json(serde_json::json!({
                "query": "avg(cpu_usage)",
                "startTime": 1_640_995_100_000i64,
                "endTime": 1_640_995_200_000i64
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "series": [{"metric": "cpu_usage", "points": [[1640995100, 0.5]]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CoralogixClient::builder()
            .api_key("test-api-key")
            .base_url(server.uri())
            .build()
            .unwrap();

        let data = client
            .metrics()
            .query(&MetricsQuery {
                query: "avg(cpu_usage)".to_string(),
                from: 1_640_995_100.0,
                to: 1_640_995_200.0,
            })
            .await
            .unwrap();

        assert_eq!(data.unwrap()["series"][0]["metric"], "cpu_usage");
    }
}
