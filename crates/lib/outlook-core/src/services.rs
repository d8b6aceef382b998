use std::sync::Arc;

use tracing::debug;

use crate::client::{GraphClient, GraphConfig};
use crate::control::MailControlPlane;
use crate::error::GraphResult;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Hands out Graph clients bound to a caller's bearer token.
///
/// One pooled `reqwest::Client` is shared by every client it builds. A token
/// supplied with the request wins over the configured default token.
#[derive(Clone)]
pub struct GraphClientProvider {
    http: reqwest::Client,
    config: Arc<GraphConfig>,
    default_token: Option<String>,
}

impl GraphClientProvider {
    /// Builds the shared HTTP pool from `config`.
    ///
    /// # Errors
    /// Returns a transport error if the HTTP client cannot be constructed.
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
            default_token: None,
        })
    }

    #[must_use]
    pub fn with_default_token(mut self, token: Option<String>) -> Self {
        self.default_token = token.filter(|value| !value.trim().is_empty());
        self
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[must_use]
    pub fn has_default_token(&self) -> bool {
        self.default_token.is_some()
    }

    /// Returns a client for one request, preferring `request_token`.
    #[must_use]
    pub fn client(&self, request_token: Option<String>) -> GraphClient {
        let token = request_token
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.default_token.clone());
        debug!(authenticated = token.is_some(), "graph client resolved");
        GraphClient::new(self.http.clone(), Arc::clone(&self.config), token)
    }

    #[must_use]
    pub fn control(&self, request_token: Option<String>) -> MailControlPlane {
        MailControlPlane::new(self.client(request_token))
    }
}
