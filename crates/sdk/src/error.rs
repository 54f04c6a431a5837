//! Error types for the Coralogix SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Error types that can occur when calling the Coralogix API.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// HTTP request failed (connect, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SdkError {
    /// Create an API error from a status code and response body.
    ///
    /// Coralogix reports failures as `{"message": "..."}`; a bare body is
    /// kept verbatim as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
            Self::Api {
                status,
                message: error_response.message,
                details: error_response.details,
            }
        } else {
            Self::Api {
                status,
                message: body.to_string(),
                details: None,
            }
        }
    }

    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error body returned by the Coralogix API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_message_field() {
        let err = SdkError::from_response(429, r#"{"message":"Rate limit exceeded"}"#);
        match &err {
            SdkError::Api { status, message, .. } => {
                assert_eq!(*status, 429);
                assert_eq!(message, "Rate limit exceeded");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
        assert!(err.to_string().contains("Rate limit exceeded"));
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_from_response_accepts_error_field() {
        let err = SdkError::from_response(400, r#"{"error":"Bad Request","details":"limit"}"#);
        match err {
            SdkError::Api { message, details, .. } => {
                assert_eq!(message, "Bad Request");
                assert_eq!(details.as_deref(), Some("limit"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_plain_body() {
        let err = SdkError::from_response(502, "upstream unavailable");
        assert_eq!(
            err.to_string(),
            "API error (status 502): upstream unavailable"
        );
    }

    #[test]
    fn test_config_error_has_no_status() {
        assert_eq!(SdkError::Config("nope".into()).status(), None);
    }
}
