// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use coralogix_mcp::config::{Cli, ServerConfig};
use coralogix_mcp::observability::init_tracing;
use coralogix_mcp::tools::{catalog, handlers};
use coralogix_mcp::{Dispatcher, McpServer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = ServerConfig::from_cli(cli)?;
    let client = config.client()?;

    tracing::info!(
        region = %config.region,
        base_url = %client.base_url(),
        "Coralogix MCP server starting"
    );

    // Wire tools
    let registry = catalog().context("Failed to build tool catalog")?;
    let handlers = handlers(&client).context("Failed to build tool handlers")?;
    let dispatcher = Dispatcher::new(registry, handlers).context("Tool wiring is inconsistent")?;

    tracing::info!(tools = dispatcher.registry().len(), "Registered tools");

    McpServer::new(dispatcher).serve_stdio().await
}
