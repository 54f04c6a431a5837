//! HTTP transport layer for the Coralogix SDK.

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Authenticated HTTP transport. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> SdkResult<Self> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| SdkError::Config("Invalid API key format".to_string()))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for `path` under the base URL, keeping any base path prefix.
    fn build_url(&self, path: &str) -> SdkResult<Url> {
        let mut base = self.config.base_url.clone();
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Build a URL for `path` with one extra, percent-encoded path segment.
    fn build_url_with_segment(&self, path: &str, segment: &str) -> SdkResult<Url> {
        let mut url = self.build_url(path)?;
        let shown = url.to_string();
        url.path_segments_mut()
            .map_err(|_| SdkError::Config(format!("Base URL cannot be a base: {}", shown)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Send a request and decode the JSON body of a successful response.
    ///
    /// An empty body decodes as JSON `null`.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> SdkResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "Request failed");
            return Err(SdkError::from_response(status.as_u16(), &body));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        self.execute(self.client.get(url)).await
    }

    /// Execute a GET request for a single resource under `path`.
    pub async fn get_resource<T: DeserializeOwned>(&self, path: &str, id: &str) -> SdkResult<T> {
        let url = self.build_url_with_segment(path, id)?;
        debug!(url = %url, "GET request");

        self.execute(self.client.get(url)).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> SdkResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");

        self.execute(self.client.get(url).query(query)).await
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> SdkResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        self.execute(self.client.post(url).json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(base_url: &str) -> HttpTransport {
        let config = ClientConfig::new(Url::parse(base_url).unwrap(), "test-api-key");
        HttpTransport::new(Arc::new(config)).unwrap()
    }

    #[tokio::test]
    async fn test_every_request_is_authenticated() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/services"))
            .and(header("Authorization", "Bearer test-api-key"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"services": ["web"]})))
            .expect(1)
            .mount(&server)
            .await;

        let body: Value = transport(&server.uri()).get("/api/v1/services").await.unwrap();
        assert_eq!(body["services"][0], "web");
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/metrics/query"))
            .and(body_json(json!({"query": "up"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"series": []})))
            .expect(1)
            .mount(&server)
            .await;

        let body: Value = transport(&server.uri())
            .post("/api/v1/metrics/query", &json!({"query": "up"}))
            .await
            .unwrap();
        assert_eq!(body, json!({"series": []}));
    }

    #[tokio::test]
    async fn test_get_with_query_encodes_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/alerts"))
            .and(query_param("limit", "5"))
            .and(query_param("status", "active"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"alerts": []})))
            .expect(1)
            .mount(&server)
            .await;

        let body: Value = transport(&server.uri())
            .get_with_query("/api/v1/alerts", &[("limit", "5"), ("status", "active")])
            .await
            .unwrap();
        assert_eq!(body["alerts"], json!([]));
    }

    #[tokio::test]
    async fn test_null_body_decodes_to_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/alerts/a-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let body: Option<Value> = transport(&server.uri())
            .get_resource("/api/v1/alerts", "a-1")
            .await
            .unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_upstream_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/logs/search"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({"message": "Rate limit exceeded"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = transport(&server.uri())
            .post::<Value, _>("/api/v1/logs/search", &json!({}))
            .await
            .unwrap_err();

        match err {
            SdkError::Api { status, message, .. } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit exceeded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/services"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = transport(&server.uri())
            .get::<Value>("/api/v1/services")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
    }

    #[test]
    fn test_build_url() {
        let url = transport("http://localhost:8080")
            .build_url("/api/v1/alerts")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/alerts");
    }

    #[test]
    fn test_build_url_keeps_base_path_prefix() {
        let expected = "https://proxy.example.com/coralogix/api/v1/alerts";
        for base in ["https://proxy.example.com/coralogix/", "https://proxy.example.com/coralogix"] {
            let url = transport(base).build_url("/api/v1/alerts").unwrap();
            assert_eq!(url.as_str(), expected, "base {}", base);
        }

        let url = transport("https://proxy.example.com/coralogix")
            .build_url_with_segment("/api/v1/alerts", "a-1")
            .unwrap();
        assert_eq!(url.as_str(), "https://proxy.example.com/coralogix/api/v1/alerts/a-1");
    }

    #[tokio::test]
    async fn test_prefixed_base_url_reaches_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coralogix/api/v1/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"services": []})))
            .expect(1)
            .mount(&server)
            .await;

        let body: Value = transport(&format!("{}/coralogix/", server.uri()))
            .get("/api/v1/services")
            .await
            .unwrap();
        assert_eq!(body["services"], json!([]));
    }

    #[tokio::test]
    async fn test_empty_body_decodes_to_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/alerts/a-1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let body: Option<Value> = transport(&server.uri())
            .get_resource("/api/v1/alerts", "a-1")
            .await
            .unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/services"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = transport(&server.uri())
            .get::<Value>("/api/v1/services")
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Json(_)));
    }

    #[test]
    fn test_resource_segment_is_percent_encoded() {
        let url = transport("http://localhost:8080/")
            .build_url_with_segment("/api/v1/alerts", "a/b c")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/alerts/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let config = ClientConfig::new(Url::parse("http://localhost").unwrap(), "bad\nkey");
        assert!(matches!(
            HttpTransport::new(Arc::new(config)),
            Err(SdkError::Config(_))
        ));
    }
}
