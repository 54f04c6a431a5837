//! MCP (Model Context Protocol) server for Coralogix.
//!
//! Tools are declared with a [`schema::Schema`], collected into a
//! [`tools::ToolRegistry`], bound to handlers over the Coralogix SDK and served
//! by [`server::McpServer`] as JSON-RPC 2.0 over stdio. Every invocation goes
//! through the [`dispatcher::Dispatcher`], which validates arguments before a
//! handler runs.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod tools;

pub use dispatcher::Dispatcher;
pub use error::{ToolError, ToolResult};
pub use server::McpServer;
