//! Authenticated HTTP access to Microsoft Graph.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Upload-session chunks must be multiples of 320 KiB.
pub const UPLOAD_CHUNK_ALIGNMENT: u64 = 327_680;
pub const DEFAULT_UPLOAD_CHUNK_BYTES: u64 = 10 * UPLOAD_CHUNK_ALIGNMENT;

/// Settings shared by every Graph client handed out by a provider.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub upload_chunk_bytes: u64,
}

impl GraphConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_chunk_bytes: DEFAULT_UPLOAD_CHUNK_BYTES,
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub const fn with_upload_chunk_bytes(mut self, upload_chunk_bytes: u64) -> Self {
        self.upload_chunk_bytes = upload_chunk_bytes;
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRAPH_BASE_URL)
    }
}

/// Graph client bound to one caller's bearer token.
///
/// Cheap to clone: the underlying connection pool and config are shared.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    config: Arc<GraphConfig>,
    token: Option<String>,
}

impl GraphClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: Arc<GraphConfig>, token: Option<String>) -> Self {
        Self {
            http,
            config,
            token: token.filter(|value| !value.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Joins a Graph path (starting with `/`) onto the configured base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Starts an authenticated request.
    ///
    /// # Errors
    /// Returns [`GraphError::MissingAuth`] when the client carries no token.
    pub fn request(&self, method: Method, path: &str) -> GraphResult<GraphRequest> {
        let token = self.token.as_deref().ok_or(GraphError::MissingAuth)?;
        let url = self.url(path);
        debug!(%method, %url, "graph request");
        Ok(GraphRequest {
            builder: self.http.request(method, url).bearer_auth(token),
        })
    }

    pub(crate) fn get(&self, path: &str) -> GraphResult<GraphRequest> {
        self.request(Method::GET, path)
    }

    pub(crate) fn post(&self, path: &str) -> GraphResult<GraphRequest> {
        self.request(Method::POST, path)
    }

    pub(crate) fn patch(&self, path: &str) -> GraphResult<GraphRequest> {
        self.request(Method::PATCH, path)
    }

    pub(crate) fn delete(&self, path: &str) -> GraphResult<GraphRequest> {
        self.request(Method::DELETE, path)
    }
}

/// A pending Graph request.
pub struct GraphRequest {
    builder: RequestBuilder,
}

impl GraphRequest {
    #[must_use]
    pub fn query(self, key: &str, value: &str) -> Self {
        Self {
            builder: self.builder.query(&[(key, value)]),
        }
    }

    /// Adds a query parameter only when a non-blank value is supplied.
    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn header(self, name: &'static str, value: impl Into<String>) -> Self {
        Self {
            builder: self.builder.header(name, value.into()),
        }
    }

    #[must_use]
    pub fn json(self, body: &Value) -> Self {
        Self {
            builder: self.builder.json(body),
        }
    }

    /// Sends the request and decodes the JSON reply.
    ///
    /// # Errors
    /// Returns transport, status, or decode errors.
    pub async fn send(self) -> GraphResult<Value> {
        let response = self.builder.send().await?;
        read_json(response).await
    }

    /// Sends the request and returns the raw body bytes.
    ///
    /// # Errors
    /// Returns transport or status errors.
    pub async fn send_bytes(self) -> GraphResult<Vec<u8>> {
        let response = self.builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "graph request failed");
            return Err(GraphError::from_response(status, &body));
        }
        Ok(body.to_vec())
    }
}

/// Designated result of a successful call that returns no content.
#[must_use]
pub fn acknowledged() -> Value {
    json!({ "success": true })
}

pub(crate) async fn read_json(response: Response) -> GraphResult<Value> {
    let status = response.status();
    let path = response.url().path().to_string();
    let body = response.bytes().await?;
    if !status.is_success() {
        warn!(status = status.as_u16(), %path, "graph request failed");
        return Err(GraphError::from_response(status, &body));
    }
    if status == StatusCode::NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(acknowledged());
    }
    serde_json::from_slice(&body).map_err(|err| GraphError::Decode(err.to_string()))
}
