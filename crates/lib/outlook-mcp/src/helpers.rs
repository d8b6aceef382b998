use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use outlook_core::error::GraphResult;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tracing::warn;

/// Header carrying a raw Graph access token, checked before `Authorization`.
pub(crate) const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Maps a facade result onto a tool result.
///
/// Graph and auth failures become error-flagged tool results carrying the
/// error payload; only serialization problems surface as protocol errors.
pub(crate) fn into_tool_result(result: GraphResult<Value>) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(value) => Ok(CallToolResult::success(vec![Content::json(value)?])),
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "outlook tool call failed");
            Ok(CallToolResult::error(vec![Content::json(err.to_payload())?]))
        }
    }
}

/// Extracts the caller's bearer token from HTTP request headers.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(token) = raw {
        return Some(token.to_string());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Drops blank optional strings so they are treated as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
