//! Daemon entry point for the Outlook Mail MCP server.
//!
//! Loads configuration from `.env`, the environment and CLI arguments, builds
//! the shared Graph client provider, and serves MCP over stdio and/or
//! streamable HTTP.

mod config;
mod provider;

use std::sync::Arc;

use outlook_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::OutlookConfig;
use crate::provider::build_provider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    let config = OutlookConfig::from_args()?;

    // stdout carries the stdio MCP channel.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let provider = Arc::new(build_provider(&config)?);
    if !provider.has_default_token() {
        warn!("no default access token configured; callers must send their own");
    }
    info!(graph_base_url = %config.graph_base_url, "outlook-mcpd starting");

    let mut servers = JoinSet::new();
    if config.mcp_serve {
        let http = McpHttpServerConfig::new(config.mcp_http_addr)
            .with_stateful_mode(!config.stateless);
        servers.spawn(serve_streamable_http(Arc::clone(&provider), http));
    }
    if config.enable_stdio {
        servers.spawn(serve_stdio(Arc::clone(&provider)));
    }

    while let Some(joined) = servers.join_next().await {
        joined??;
    }
    Ok(())
}
