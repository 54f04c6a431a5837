//! API areas exposed by the Coralogix client.
//!
//! Each area is a thin accessor over [`HttpTransport`](crate::transport::HttpTransport)
//! with one method per upstream operation.

mod alerts;
mod logs;
mod metrics;
mod traces;

pub use alerts::{AlertFilter, AlertsApi, AlertsResponse};
pub use logs::{LogSearch, LogsApi, LogsResponse, ServicesResponse};
pub use metrics::{MetricsApi, MetricsQuery};
pub use traces::{TraceSearch, TracesApi, TracesResponse};

use serde::Serialize;

/// Limit sent to search endpoints when the caller leaves it unset.
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;

/// Wire body shared by the time-bounded query endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimeRangeBody<'a> {
    pub query: &'a str,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl<'a> TimeRangeBody<'a> {
    /// Build a body from epoch-second bounds.
    pub fn from_seconds(query: &'a str, from: f64, to: f64, limit: Option<u32>) -> Self {
        Self {
            query,
            start_time: epoch_millis(from),
            end_time: epoch_millis(to),
            limit,
        }
    }
}

/// Convert epoch seconds to the millisecond timestamps the API expects.
///
/// Fractional seconds round to the nearest millisecond; the cast saturates.
pub(crate) fn epoch_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}
