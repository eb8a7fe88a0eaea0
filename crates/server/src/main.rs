//! inkwell server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use inkwell_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), "Starting inkwell server on stdio transport");

    let cache = CacheDb::open(&config.db_path).await?;
    let state = state::AppState::build(config, cache)?;
    if state.repository().is_err() {
        tracing::warn!("content store not configured; challenge_list is unavailable");
    }
    if state.feedback().is_err() {
        tracing::warn!("feedback endpoint not configured; paragraph_feedback is unavailable");
    }

    let handler = handler::InkwellServer::new(Arc::new(state));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
