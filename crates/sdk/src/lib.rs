//! # Coralogix SDK
//!
//! Thin async client for the Coralogix REST API areas used by the MCP server:
//! alerts, logs, metrics and traces.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coralogix_sdk::{CoralogixClient, Region, SdkResult};
//! use coralogix_sdk::api::LogSearch;
//!
//! # async fn example() -> SdkResult<()> {
//! let client = CoralogixClient::builder()
//!     .api_key("cxup_your_api_key")
//!     .region(Region::Us)
//!     .build()?;
//!
//! let response = client
//!     .logs()
//!     .search(&LogSearch {
//!         query: "service:checkout".to_string(),
//!         from: 1_640_995_100.0,
//!         to: 1_640_995_200.0,
//!         limit: Some(10),
//!     })
//!     .await?;
//! println!("logs: {:?}", response.logs);
//! # Ok(())
//! # }
//! ```
//!
//! Every accessor performs exactly one HTTP call. Time bounds are passed in
//! epoch seconds and converted to the millisecond wire format here.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{CoralogixClient, CoralogixClientBuilder};
pub use config::{ClientConfig, Region};
pub use error::{SdkError, SdkResult};
