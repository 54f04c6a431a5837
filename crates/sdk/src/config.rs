//! Configuration types for the Coralogix SDK.

use crate::error::SdkError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Coralogix deployment region. Each region has its own API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Europe,
    Europe2,
    India,
    Us,
    Singapore,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Europe,
        Region::Europe2,
        Region::India,
        Region::Us,
        Region::Singapore,
    ];

    /// Base API endpoint for this region.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Region::Europe => "https://api.coralogix.com",
            Region::Europe2 => "https://api.eu2.coralogix.com",
            Region::India => "https://api.app.coralogix.in",
            Region::Us => "https://api.coralogix.us",
            Region::Singapore => "https://api.coralogixsg.com",
        }
    }

    /// Region name as accepted by `CORALOGIX_REGION`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Europe => "EUROPE",
            Region::Europe2 => "EUROPE2",
            Region::India => "INDIA",
            Region::Us => "US",
            Region::Singapore => "SINGAPORE",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Region::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Region::ALL.iter().map(|r| r.as_str()).collect();
                SdkError::Config(format!(
                    "Invalid region: {}. Valid regions are: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// Configuration for the Coralogix client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Coralogix API.
    pub base_url: Url,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL and API key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }
}
