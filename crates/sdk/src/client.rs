//! Main client for the Coralogix SDK.

use crate::api::{AlertsApi, LogsApi, MetricsApi, TracesApi};
use crate::config::{ClientConfig, Region};
use crate::error::{SdkError, SdkResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for interacting with the Coralogix API.
///
/// Cheap to clone; every accessor shares the same connection pool.
#[derive(Debug, Clone)]
pub struct CoralogixClient {
    config: Arc<ClientConfig>,
    http: HttpTransport,
}

impl CoralogixClient {
    /// Create a new client builder.
    pub fn builder() -> CoralogixClientBuilder {
        CoralogixClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> SdkResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Get the alerts API.
    pub fn alerts(&self) -> AlertsApi {
        AlertsApi::new(self.http.clone())
    }

    /// Get the logs API.
    pub fn logs(&self) -> LogsApi {
        LogsApi::new(self.http.clone())
    }

    /// Get the metrics API.
    pub fn metrics(&self) -> MetricsApi {
        MetricsApi::new(self.http.clone())
    }

    /// Get the traces API.
    pub fn traces(&self) -> TracesApi {
        TracesApi::new(self.http.clone())
    }
}

/// Builder for creating a CoralogixClient.
#[derive(Debug)]
pub struct CoralogixClientBuilder {
    api_key: Option<String>,
    region: Region,
    base_url: Option<String>,
    timeout: Duration,
}

impl CoralogixClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            api_key: None,
            region: Region::default(),
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Select the region endpoint. Ignored when `base_url` is set.
    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Override the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<CoralogixClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SdkError::Config("Coralogix API key is required".to_string()))?;

        let base_url = match self.base_url {
            Some(url) => Url::parse(&url)?,
            None => Url::parse(self.region.endpoint())?,
        };

        let config = ClientConfig {
            base_url,
            api_key,
            timeout: self.timeout,
        };

        CoralogixClient::from_config(config)
    }
}

impl Default for CoralogixClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uses_region_endpoint() {
        let client = CoralogixClient::builder()
            .api_key("test-api-key")
            .region(Region::Us)
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "https://api.coralogix.us/");
    }

    #[test]
    fn test_build_defaults_to_europe() {
        let client = CoralogixClient::builder()
            .api_key("test-api-key")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "https://api.coralogix.com/");
    }

    #[test]
    fn test_base_url_overrides_region() {
        let client = CoralogixClient::builder()
            .api_key("test-api-key")
            .region(Region::India)
            .base_url("http://127.0.0.1:9999")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9999/");
    }

    #[test]
    fn test_missing_api_key() {
        let err = CoralogixClient::builder().build().unwrap_err();
        assert!(err.to_string().contains("Coralogix API key is required"));

        let err = CoralogixClient::builder().api_key("  ").build().unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = CoralogixClient::builder()
            .api_key("k")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidUrl(_)));
    }
}
