use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::fs::File;
use tracing::info;

use crate::control::{MailControlPlane, require_text, segment};
use crate::error::{GraphError, GraphResult};
use crate::upload::{self, AttachmentItem};

pub const FILE_ATTACHMENT_TYPE: &str = "#microsoft.graph.fileAttachment";

/// Large-file attachment sent through an upload session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LargeAttachmentUpload {
    pub message_id: String,
    pub file_path: PathBuf,
    pub is_inline: bool,
    /// Content-ID for inline images.
    pub content_id: Option<String>,
}

impl MailControlPlane {
    pub async fn list_attachments(&self, message_id: &str) -> GraphResult<Value> {
        self.client()
            .get(&attachments_path(message_id)?)?
            .send()
            .await
    }

    pub async fn get_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
        expand: Option<&str>,
    ) -> GraphResult<Value> {
        self.client()
            .get(&attachment_path(message_id, attachment_id)?)?
            .query_opt("$expand", expand)
            .send()
            .await
    }

    /// Downloads the raw attachment content (`$value`) into `save_path`.
    pub async fn download_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
        save_path: &Path,
    ) -> GraphResult<Value> {
        if save_path.as_os_str().is_empty() {
            return Err(GraphError::invalid_input("save_path is required"));
        }
        let path = format!("{}/$value", attachment_path(message_id, attachment_id)?);
        let bytes = self.client().get(&path)?.send_bytes().await?;
        tokio::fs::write(save_path, &bytes).await?;
        info!(
            attachment_id,
            path = %save_path.display(),
            bytes = bytes.len(),
            "saved attachment"
        );
        Ok(json!({ "path": save_path.display().to_string(), "bytes": bytes.len() }))
    }

    pub async fn delete_attachment(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> GraphResult<Value> {
        let result = self
            .client()
            .delete(&attachment_path(message_id, attachment_id)?)?
            .send()
            .await?;
        info!(attachment_id, "deleted attachment");
        Ok(result)
    }

    /// Attaches a small local file inline as base64 content.
    ///
    /// The attachment name defaults to the file name.
    pub async fn add_attachment(
        &self,
        message_id: &str,
        file_path: &Path,
        attachment_name: Option<&str>,
    ) -> GraphResult<Value> {
        let path = attachments_path(message_id)?;
        let name = match attachment_name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => file_name(file_path)?,
        };
        let content = tokio::fs::read(file_path).await?;
        let body = json!({
            "@odata.type": FILE_ATTACHMENT_TYPE,
            "name": name,
            "contentBytes": STANDARD.encode(&content),
        });
        let created = self.client().post(&path)?.json(&body).send().await?;
        info!(message_id, name = name.as_str(), bytes = content.len(), "added attachment");
        Ok(created)
    }

    /// Uploads a large file through an upload session in ordered chunks.
    pub async fn upload_large_attachment(
        &self,
        request: &LargeAttachmentUpload,
    ) -> GraphResult<Value> {
        let session_path = format!(
            "{}/createUploadSession",
            attachments_path(&request.message_id)?
        );
        let metadata = tokio::fs::metadata(&request.file_path).await?;
        if !metadata.is_file() {
            return Err(GraphError::invalid_input(format!(
                "not a regular file: {}",
                request.file_path.display()
            )));
        }
        let size = metadata.len();
        if size == 0 {
            return Err(GraphError::invalid_input("cannot upload an empty file"));
        }
        // Must open before the session exists.
        let file = File::open(&request.file_path).await?;
        let item = AttachmentItem {
            name: file_name(&request.file_path)?,
            size,
            is_inline: request.is_inline,
            content_id: request.content_id.clone(),
        };
        let upload_url = upload::create_session(self.client(), &session_path, &item).await?;
        let result =
            upload::upload_chunks(self.client(), &upload_url, file, size).await?;
        info!(
            message_id = request.message_id.as_str(),
            name = item.name.as_str(),
            size,
            "uploaded large attachment"
        );
        Ok(result)
    }
}

fn attachments_path(message_id: &str) -> GraphResult<String> {
    Ok(format!(
        "/me/messages/{}/attachments",
        segment("message_id", message_id)?
    ))
}

fn attachment_path(message_id: &str, attachment_id: &str) -> GraphResult<String> {
    Ok(format!(
        "{}/{}",
        attachments_path(message_id)?,
        segment("attachment_id", attachment_id)?
    ))
}

fn file_name(file_path: &Path) -> GraphResult<String> {
    let name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    require_text("file_path", &name)?;
    Ok(name)
}
