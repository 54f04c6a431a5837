//! Transport layer for the Coralogix SDK.

pub mod http;

pub use http::HttpTransport;
