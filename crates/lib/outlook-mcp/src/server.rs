//! MCP server runners for outlook-mcp.
//!
//! Over stdio every call runs with the provider's configured token. Over
//! streamable HTTP each POST to `/mcp` may carry its own Graph token in
//! `x-auth-token` or `Authorization: Bearer`, so one listener can serve many
//! mailboxes. In stateless mode no session outlives a request, which keeps a
//! caller's token scoped to the call that sent it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use outlook_core::services::GraphClientProvider;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::OutlookMcp;

pub const DEFAULT_MCP_HTTP_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 5000);

/// Listener settings for the `/mcp` streamable HTTP endpoint.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    /// Keep `Mcp-Session-Id` sessions between requests. Tokens are still read
    /// from each request's headers either way.
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

impl McpHttpServerConfig {
    /// Session-less by default; every request carries its own token.
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: false,
            sse_keep_alive: Some(Duration::from_secs(15)),
            sse_retry: Some(Duration::from_secs(3)),
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }

    #[must_use]
    pub const fn with_sse_keep_alive(mut self, sse_keep_alive: Option<Duration>) -> Self {
        self.sse_keep_alive = sse_keep_alive;
        self
    }

    #[must_use]
    pub const fn with_sse_retry(mut self, sse_retry: Option<Duration>) -> Self {
        self.sse_retry = sse_retry;
        self
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MCP_HTTP_ADDR)
    }
}

/// Serves the MCP server over stdio.
///
/// Stdio has no request headers, so every call uses the provider's default
/// token and fails with `missing_auth` when none is configured.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    provider: Arc<GraphClientProvider>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = OutlookMcp::with_provider(provider);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    info!("mcp stdio transport ready");
    let _ = running.waiting().await?;
    Ok(())
}

/// Builds the axum router exposing `/mcp` and `/health`.
///
/// Each MCP request builds its Graph client from the headers of that request,
/// falling back to the provider's default token.
#[must_use]
pub fn router(provider: Arc<GraphClientProvider>, config: &McpHttpServerConfig) -> Router {
    let service: StreamableHttpService<OutlookMcp, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(OutlookMcp::with_provider(Arc::clone(&provider))),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                sse_keep_alive: config.sse_keep_alive,
                sse_retry: config.sse_retry,
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service)
}

/// Binds `config.addr` and serves [`router`] until the listener fails.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    provider: Arc<GraphClientProvider>,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(provider, &config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, stateful = config.stateful_mode, "mcp http transport listening");
    axum::serve(listener, app).await?;
    Ok(())
}
