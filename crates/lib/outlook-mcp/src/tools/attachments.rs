use std::path::PathBuf;

use outlook_core::control::LargeAttachmentUpload;
use rmcp::{
    ErrorData,
    RoleServer,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    service::RequestContext,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::tools::messages::MessageIdParams;
use crate::{OutlookMcp, helpers};

/// Parameters naming a single attachment.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AttachmentParams {
    pub message_id: String,
    pub attachment_id: String,
}

/// Parameters for fetching attachment metadata.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetAttachmentParams {
    pub message_id: String,
    pub attachment_id: String,
    /// OData `$expand`, e.g. `microsoft.graph.itemattachment/item`.
    pub expand: Option<String>,
}

/// Parameters for saving attachment content to disk.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DownloadAttachmentParams {
    pub message_id: String,
    pub attachment_id: String,
    /// Local path on the server host to write to.
    pub save_path: String,
}

/// Parameters for attaching a small local file to a draft.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AddAttachmentParams {
    pub message_id: String,
    /// Local path on the server host.
    pub file_path: String,
    /// Name shown in the message; defaults to the file name.
    pub attachment_name: Option<String>,
}

/// Parameters for uploading a large file through an upload session.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UploadLargeAttachmentParams {
    pub message_id: String,
    /// Local path on the server host.
    pub file_path: String,
    #[serde(default)]
    pub is_inline: bool,
    /// Content-ID for inline images.
    pub content_id: Option<String>,
}

#[tool_router(router = tool_router_attachments, vis = "pub")]
impl OutlookMcp {
    #[tool(
        name = "outlookMail_list_attachments",
        description = "List the attachments of a message."
    )]
    async fn list_attachments(
        &self,
        Parameters(params): Parameters<MessageIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .list_attachments(&params.message_id)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_get_attachment",
        description = "Fetch attachment metadata and content, optionally expanding item attachments."
    )]
    async fn get_attachment(
        &self,
        Parameters(params): Parameters<GetAttachmentParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .get_attachment(
                &params.message_id,
                &params.attachment_id,
                helpers::non_blank(params.expand.as_deref()),
            )
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_download_attachment",
        description = "Download the raw content of an attachment to a file on the server host."
    )]
    async fn download_attachment(
        &self,
        Parameters(params): Parameters<DownloadAttachmentParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let save_path = PathBuf::from(params.save_path);
        let result = self
            .mail_for(&context)
            .download_attachment(&params.message_id, &params.attachment_id, &save_path)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_delete_attachment",
        description = "Delete an attachment from a message."
    )]
    async fn delete_attachment(
        &self,
        Parameters(params): Parameters<AttachmentParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .delete_attachment(&params.message_id, &params.attachment_id)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_add_attachment",
        description = "Attach a local file (under 3 MB) to a draft message."
    )]
    async fn add_attachment(
        &self,
        Parameters(params): Parameters<AddAttachmentParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let file_path = PathBuf::from(params.file_path);
        let result = self
            .mail_for(&context)
            .add_attachment(
                &params.message_id,
                &file_path,
                params.attachment_name.as_deref(),
            )
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_upload_large_attachment",
        description = "Attach a large local file to a draft using a chunked upload session."
    )]
    async fn upload_large_attachment(
        &self,
        Parameters(params): Parameters<UploadLargeAttachmentParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = LargeAttachmentUpload {
            message_id: params.message_id,
            file_path: PathBuf::from(params.file_path),
            is_inline: params.is_inline,
            content_id: params.content_id,
        };
        let result = self
            .mail_for(&context)
            .upload_large_attachment(&request)
            .await;
        helpers::into_tool_result(result)
    }
}
