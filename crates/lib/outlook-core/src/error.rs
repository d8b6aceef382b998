use std::{error::Error, fmt, io};

use reqwest::StatusCode;
use serde_json::{Map, Value, json};

pub type GraphResult<T> = Result<T, GraphError>;

/// Failure of a single Graph operation.
#[derive(Debug)]
pub enum GraphError {
    MissingAuth,
    InvalidInput(String),
    Transport(reqwest::Error),
    Status {
        status: StatusCode,
        message: String,
        details: Option<Value>,
    },
    Decode(String),
    Io(io::Error),
    UploadSession(String),
}

impl GraphError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Builds a status error from a non-2xx response body.
    ///
    /// Graph wraps failures as `{"error": {"code": ..., "message": ...}}`; the
    /// inner message is surfaced when present, the raw text otherwise.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let details = serde_json::from_slice::<Value>(body).ok();
        let message = details
            .as_ref()
            .and_then(|value| value.pointer("/error/message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });
        Self::Status {
            status,
            message,
            details,
        }
    }

    /// Stable machine-readable category of the failure.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingAuth => "missing_auth",
            Self::InvalidInput(_) => "invalid_input",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "http_status",
            Self::Decode(_) => "decode",
            Self::Io(_) => "io",
            Self::UploadSession(_) => "upload_session",
        }
    }

    /// HTTP status of the remote response, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(status.as_u16()),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Renders the error-shaped value handed back to tool callers.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("error".to_string(), json!(self.to_string()));
        payload.insert("kind".to_string(), json!(self.kind()));
        if let Some(status) = self.status() {
            payload.insert("status".to_string(), json!(status));
        }
        if let Self::Status {
            details: Some(details),
            ..
        } = self
        {
            payload.insert("details".to_string(), details.clone());
        }
        Value::Object(payload)
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuth => write!(f, "no access token available for the Outlook client"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Transport(err) => write!(f, "graph request failed: {err}"),
            Self::Status {
                status, message, ..
            } => write!(f, "graph returned {}: {message}", status.as_u16()),
            Self::Decode(message) => write!(f, "could not decode graph response: {message}"),
            Self::Io(err) => write!(f, "file error: {err}"),
            Self::UploadSession(message) => write!(f, "upload session failed: {message}"),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<io::Error> for GraphError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_graph_message() {
        let body = br#"{"error":{"code":"ErrorItemNotFound","message":"The specified object was not found in the store."}}"#;
        let err = GraphError::from_response(StatusCode::NOT_FOUND, body);

        assert_eq!(err.kind(), "http_status");
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "graph returned 404: The specified object was not found in the store."
        );

        let payload = err.to_payload();
        assert_eq!(payload["kind"], "http_status");
        assert_eq!(payload["status"], 404);
        assert_eq!(payload["details"]["error"]["code"], "ErrorItemNotFound");
    }

    #[test]
    fn status_error_falls_back_to_reason_for_empty_body() {
        let err = GraphError::from_response(StatusCode::BAD_GATEWAY, b"");

        assert_eq!(err.to_string(), "graph returned 502: Bad Gateway");
        assert!(err.to_payload().get("details").is_none());
    }

    #[test]
    fn missing_auth_payload_has_no_status() {
        let payload = GraphError::MissingAuth.to_payload();

        assert_eq!(payload["kind"], "missing_auth");
        assert!(payload["error"].as_str().is_some());
        assert!(payload.get("status").is_none());
    }
}
