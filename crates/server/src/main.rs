//! svgl server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use svgl_client::IconSearch;
use svgl_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    tracing::info!(
        api = %config.api_base_url,
        cache_dir = %config.cache_dir.display(),
        "Starting svgl-mcp server on stdio transport"
    );

    let search = Arc::new(IconSearch::from_config(&config)?);
    let handler = handler::McpSvglServer::new(search.clone());
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;
    search.shutdown();

    Ok(())
}
