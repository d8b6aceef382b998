use outlook_core::control::{DraftRequest, DraftUpdate, Mailbox, MessageQuery};
use outlook_core::payload::EmailAddress;
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
use serde_json::Value;

use crate::{OutlookMcp, helpers};

/// Mailbox address with an optional display name.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RecipientParam {
    pub address: String,
    pub name: Option<String>,
}

impl From<RecipientParam> for EmailAddress {
    fn from(param: RecipientParam) -> Self {
        Self {
            address: param.address,
            name: param.name,
        }
    }
}

/// Parameters for listing messages in the signed-in mailbox.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListMessagesParams {
    /// Maximum number of messages to return (default 10).
    pub top: Option<u32>,
    /// OData `$filter` expression, e.g. `isRead eq false`.
    pub filter_query: Option<String>,
    /// OData `$orderby` expression, e.g. `receivedDateTime desc`.
    pub orderby: Option<String>,
    /// Comma-separated properties to include.
    pub select: Option<String>,
}

impl ListMessagesParams {
    pub(crate) fn into_query(self) -> MessageQuery {
        MessageQuery {
            top: self.top,
            filter: self.filter_query,
            orderby: self.orderby,
            select: self.select,
        }
    }
}

/// Parameters for creating a draft in the Drafts folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateDraftParams {
    pub subject: String,
    /// HTML body content.
    pub body_content: String,
    pub to_recipients: Vec<String>,
    pub cc_recipients: Option<Vec<String>>,
    pub bcc_recipients: Option<Vec<String>>,
    pub reply_to: Option<Vec<String>>,
    /// `Low`, `Normal` (default) or `High`.
    pub importance: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl CreateDraftParams {
    fn into_request(self) -> DraftRequest {
        DraftRequest {
            subject: self.subject,
            body_content: self.body_content,
            to_recipients: self.to_recipients,
            cc_recipients: self.cc_recipients,
            bcc_recipients: self.bcc_recipients,
            reply_to: self.reply_to,
            importance: self.importance,
            categories: self.categories,
        }
    }
}

/// Parameters for creating a draft in a specific folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateDraftInFolderParams {
    pub folder_id: String,
    #[serde(flatten)]
    pub draft: CreateDraftParams,
}

/// Parameters for updating a draft. Only supplied fields are changed.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateDraftParams {
    pub message_id: String,
    pub subject: Option<String>,
    /// HTML body content.
    pub body_content: Option<String>,
    pub to_recipients: Option<Vec<String>>,
    pub cc_recipients: Option<Vec<String>>,
    pub bcc_recipients: Option<Vec<String>>,
    pub reply_to: Option<Vec<String>>,
    pub importance: Option<String>,
    pub internet_message_id: Option<String>,
    pub is_delivery_receipt_requested: Option<bool>,
    pub is_read: Option<bool>,
    pub is_read_receipt_requested: Option<bool>,
    /// Replaces the category list; an empty list clears it.
    pub categories: Option<Vec<String>>,
    /// `focused` or `other`.
    pub inference_classification: Option<String>,
    /// Graph `followupFlag` object, e.g. `{"flagStatus": "flagged"}`.
    pub flag: Option<Value>,
    /// Mailbox the message is sent from.
    pub from_sender: Option<RecipientParam>,
    /// Mailbox that generated the message.
    pub sender: Option<RecipientParam>,
}

impl UpdateDraftParams {
    fn into_update(self) -> (String, DraftUpdate) {
        let update = DraftUpdate {
            subject: self.subject,
            body_content: self.body_content,
            to_recipients: self.to_recipients,
            cc_recipients: self.cc_recipients,
            bcc_recipients: self.bcc_recipients,
            reply_to: self.reply_to,
            importance: self.importance,
            internet_message_id: self.internet_message_id,
            is_delivery_receipt_requested: self.is_delivery_receipt_requested,
            is_read: self.is_read,
            is_read_receipt_requested: self.is_read_receipt_requested,
            categories: self.categories,
            inference_classification: self.inference_classification,
            flag: self.flag,
            from: self.from_sender.map(EmailAddress::from),
            sender: self.sender.map(EmailAddress::from),
        };
        (self.message_id, update)
    }
}

/// Parameters naming a single message.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MessageIdParams {
    pub message_id: String,
}

/// Parameters for copying or moving a message.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RelocateMessageParams {
    pub message_id: String,
    /// Folder id or well-known name such as `archive` or `deleteditems`.
    pub destination_folder_id: String,
}

/// Parameters for message actions that carry a comment.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CommentParams {
    pub message_id: String,
    pub comment: String,
}

/// Parameters for creating a reply-all draft.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ReplyAllDraftParams {
    pub message_id: String,
    #[serde(default)]
    pub comment: String,
}

/// Parameters for forwarding a message or drafting a forward.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ForwardParams {
    pub message_id: String,
    pub to_recipients: Vec<String>,
    #[serde(default)]
    pub comment: String,
}

/// Parameters for replying with an explicit recipient list.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SendReplyCustomParams {
    pub message_id: String,
    pub comment: String,
    /// Recipients as `{"address": ..., "name": ...}` objects.
    pub to_recipients: Vec<RecipientParam>,
}

/// Parameters for permanently deleting a message.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PermanentDeleteMessageParams {
    /// User id or principal name; the signed-in user when omitted.
    pub user_id: Option<String>,
    pub message_id: String,
}

#[tool_router(router = tool_router_messages, vis = "pub")]
impl OutlookMcp {
    #[tool(
        name = "outlookMail_list_messages",
        description = "List messages in the signed-in user's mailbox with optional OData filter, ordering and field selection."
    )]
    async fn list_messages(
        &self,
        Parameters(params): Parameters<ListMessagesParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let query = params.into_query();
        helpers::into_tool_result(self.mail_for(&context).list_messages(&query).await)
    }

    #[tool(
        name = "outlookMail_create_draft",
        description = "Create a draft message in the Drafts folder."
    )]
    async fn create_draft(
        &self,
        Parameters(params): Parameters<CreateDraftParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = params.into_request();
        helpers::into_tool_result(self.mail_for(&context).create_draft(&request).await)
    }

    #[tool(
        name = "outlookMail_create_draft_in_folder",
        description = "Create a draft message inside a specific mail folder."
    )]
    async fn create_draft_in_folder(
        &self,
        Parameters(params): Parameters<CreateDraftInFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = params.draft.into_request();
        let result = self
            .mail_for(&context)
            .create_draft_in_folder(&params.folder_id, &request)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_update_draft",
        description = "Update properties of an existing message or draft. Only supplied fields are changed."
    )]
    async fn update_draft(
        &self,
        Parameters(params): Parameters<UpdateDraftParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let (message_id, update) = params.into_update();
        let result = self
            .mail_for(&context)
            .update_draft(&message_id, &update)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_delete_draft",
        description = "Delete a message or draft (moves it to Deleted Items)."
    )]
    async fn delete_draft(
        &self,
        Parameters(params): Parameters<MessageIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.mail_for(&context).delete_message(&params.message_id).await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_copy_message",
        description = "Copy a message to another folder."
    )]
    async fn copy_message(
        &self,
        Parameters(params): Parameters<RelocateMessageParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .copy_message(&params.message_id, &params.destination_folder_id)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_move_message",
        description = "Move a message to another folder."
    )]
    async fn move_message(
        &self,
        Parameters(params): Parameters<RelocateMessageParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .move_message(&params.message_id, &params.destination_folder_id)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_create_forward_draft",
        description = "Create a draft that forwards a message, to be edited and sent later."
    )]
    async fn create_forward_draft(
        &self,
        Parameters(params): Parameters<ForwardParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .create_forward_draft(&params.message_id, &params.comment, &params.to_recipients)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_create_reply_draft",
        description = "Create a draft reply to the sender of a message."
    )]
    async fn create_reply_draft(
        &self,
        Parameters(params): Parameters<CommentParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .create_reply_draft(&params.message_id, &params.comment)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_create_reply_all_draft",
        description = "Create a draft reply to the sender and all recipients of a message."
    )]
    async fn create_reply_all_draft(
        &self,
        Parameters(params): Parameters<ReplyAllDraftParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .create_reply_all_draft(&params.message_id, &params.comment)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_forward_message",
        description = "Forward a message immediately to the given recipients."
    )]
    async fn forward_message(
        &self,
        Parameters(params): Parameters<ForwardParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .forward_message(&params.message_id, &params.to_recipients, &params.comment)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_send_reply_custom",
        description = "Reply to a message, sending to an explicit list of named recipients."
    )]
    async fn send_reply_custom(
        &self,
        Parameters(params): Parameters<SendReplyCustomParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let recipients: Vec<EmailAddress> = params
            .to_recipients
            .into_iter()
            .map(EmailAddress::from)
            .collect();
        let result = self
            .mail_for(&context)
            .reply_with_recipients(&params.message_id, &params.comment, &recipients)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_reply_all",
        description = "Reply to the sender and all recipients of a message."
    )]
    async fn reply_all(
        &self,
        Parameters(params): Parameters<CommentParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .reply_all(&params.message_id, &params.comment)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_send_draft",
        description = "Send an existing draft message."
    )]
    async fn send_draft(
        &self,
        Parameters(params): Parameters<MessageIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.mail_for(&context).send_draft(&params.message_id).await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_permanent_delete",
        description = "Permanently delete a message, bypassing Deleted Items. Targets `user_id`'s mailbox when given."
    )]
    async fn permanent_delete(
        &self,
        Parameters(params): Parameters<PermanentDeleteMessageParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let mailbox = Mailbox::from_user(params.user_id);
        let result = self
            .mail_for(&context)
            .permanent_delete_message(&mailbox, &params.message_id)
            .await;
        helpers::into_tool_result(result)
    }
}
