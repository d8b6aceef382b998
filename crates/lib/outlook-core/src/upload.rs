//! Chunked upload of large attachments through a Graph upload session.
//!
//! A session is opened against the message, then the file is PUT to the
//! returned pre-authenticated URL in consecutive byte ranges. Chunks are sent
//! strictly in order and a failed chunk aborts the whole upload.

use reqwest::header::CONTENT_RANGE;
use serde_json::{Map, Value, json};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::client::{GraphClient, acknowledged, read_json};
use crate::error::{GraphError, GraphResult};

/// Inclusive byte range of one upload chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    #[must_use]
    pub const fn byte_count(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this chunk of a `total`-byte file.
    #[must_use]
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Splits `[0, total)` into consecutive ranges of at most `chunk` bytes.
#[must_use]
pub fn chunk_ranges(total: u64, chunk: u64) -> Vec<ByteRange> {
    let chunk = chunk.max(1);
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < total {
        let end = start.saturating_add(chunk).min(total) - 1;
        ranges.push(ByteRange { start, end });
        start = end + 1;
    }
    ranges
}

/// Metadata of the attachment announced when the session is opened.
#[derive(Debug, Clone)]
pub struct AttachmentItem {
    pub name: String,
    pub size: u64,
    pub is_inline: bool,
    pub content_id: Option<String>,
}

impl AttachmentItem {
    fn to_payload(&self) -> Value {
        let mut item = Map::new();
        item.insert("attachmentType".to_string(), json!("file"));
        item.insert("name".to_string(), json!(self.name));
        item.insert("size".to_string(), json!(self.size));
        item.insert("isInline".to_string(), json!(self.is_inline));
        if let Some(content_id) = self.content_id.as_deref().filter(|id| !id.trim().is_empty()) {
            item.insert("contentId".to_string(), json!(content_id));
        }
        json!({ "AttachmentItem": Value::Object(item) })
    }
}

/// Opens an upload session and returns its upload URL.
pub(crate) async fn create_session(
    client: &GraphClient,
    session_path: &str,
    item: &AttachmentItem,
) -> GraphResult<String> {
    let session = client
        .post(session_path)?
        .json(&item.to_payload())
        .send()
        .await?;
    session
        .get("uploadUrl")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GraphError::UploadSession("response did not include an uploadUrl".to_string()))
}

/// Streams `file` to `upload_url` chunk by chunk.
///
/// The upload URL carries its own credentials, so no bearer token is sent.
pub(crate) async fn upload_chunks(
    client: &GraphClient,
    upload_url: &str,
    mut file: File,
    size: u64,
) -> GraphResult<Value> {
    let chunk = client.config().upload_chunk_bytes;
    let mut last = acknowledged();
    for range in chunk_ranges(size, chunk) {
        let len = usize::try_from(range.byte_count())
            .map_err(|_| GraphError::invalid_input("upload chunk does not fit in memory"))?;
        let mut buffer = vec![0_u8; len];
        file.read_exact(&mut buffer).await?;
        let response = client
            .http()
            .put(upload_url)
            .header(CONTENT_RANGE, range.content_range(size))
            .body(buffer)
            .send()
            .await?;
        last = read_json(response).await?;
        info!(start = range.start, end = range.end, size, "uploaded attachment chunk");
    }
    Ok(last)
}
