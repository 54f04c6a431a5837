//! Error type shared by the registry, handlers and dispatcher.

use crate::schema::ValidationError;
use coralogix_sdk::SdkError;
use thiserror::Error;

/// Result type for tool operations.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Every way a tool invocation (or tool wiring at startup) can fail.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Arguments did not satisfy the tool's schema. Never reaches upstream.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No handler is registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Upstream answered successfully but without the expected payload.
    #[error("{0}")]
    DataUnavailable(String),

    /// Transport, HTTP status, auth or rate-limit failure, passed through verbatim.
    #[error(transparent)]
    Upstream(#[from] SdkError),

    /// Tool wiring is inconsistent. Raised at startup only.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ToolError {
    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation_error",
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::DataUnavailable(_) => "data_unavailable",
            ToolError::Upstream(_) => "upstream_error",
            ToolError::Configuration(_) => "configuration_error",
        }
    }
}
