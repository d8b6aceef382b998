use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::control::{MailControlPlane, Mailbox, require_text, segment};
use crate::error::{GraphError, GraphResult};
use crate::payload::{EmailAddress, Payload, html_body, named_recipients, recipients};

pub const DEFAULT_MESSAGE_PAGE_SIZE: u32 = 10;
pub const DEFAULT_IMPORTANCE: &str = "Normal";

/// OData options for message listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageQuery {
    pub top: Option<u32>,
    pub filter: Option<String>,
    pub orderby: Option<String>,
    pub select: Option<String>,
}

/// Fields for a new draft message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftRequest {
    pub subject: String,
    pub body_content: String,
    pub to_recipients: Vec<String>,
    pub cc_recipients: Option<Vec<String>>,
    pub bcc_recipients: Option<Vec<String>>,
    pub reply_to: Option<Vec<String>>,
    pub importance: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl DraftRequest {
    fn to_payload(&self) -> Value {
        let importance = self
            .importance
            .as_deref()
            .unwrap_or(DEFAULT_IMPORTANCE);
        Payload::new()
            .field("subject", self.subject.as_str())
            .field("importance", importance)
            .field("body", html_body(&self.body_content))
            .recipients("toRecipients", Some(self.to_recipients.as_slice()))
            .recipients("ccRecipients", self.cc_recipients.as_deref())
            .recipients("bccRecipients", self.bcc_recipients.as_deref())
            .recipients("replyTo", self.reply_to.as_deref())
            .optional("categories", self.categories.clone())
            .into_value()
    }
}

/// Partial update of a message. Only supplied fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftUpdate {
    pub subject: Option<String>,
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
    pub categories: Option<Vec<String>>,
    pub inference_classification: Option<String>,
    /// Graph `followupFlag` object, forwarded as-is.
    pub flag: Option<Value>,
    pub from: Option<EmailAddress>,
    pub sender: Option<EmailAddress>,
}

impl DraftUpdate {
    fn to_payload(&self) -> Payload {
        Payload::new()
            .optional("subject", self.subject.clone())
            .optional(
                "body",
                self.body_content.as_deref().map(html_body),
            )
            .recipients("toRecipients", self.to_recipients.as_deref())
            .recipients("ccRecipients", self.cc_recipients.as_deref())
            .recipients("bccRecipients", self.bcc_recipients.as_deref())
            .recipients("replyTo", self.reply_to.as_deref())
            .optional("importance", self.importance.clone())
            .optional("internetMessageId", self.internet_message_id.clone())
            .optional(
                "isDeliveryReceiptRequested",
                self.is_delivery_receipt_requested,
            )
            .optional("isRead", self.is_read)
            .optional("isReadReceiptRequested", self.is_read_receipt_requested)
            .optional("categories", self.categories.clone())
            .optional(
                "inferenceClassification",
                self.inference_classification.clone(),
            )
            .optional("flag", self.flag.clone())
            .recipient("from", self.from.as_ref())
            .recipient("sender", self.sender.as_ref())
    }
}

impl MailControlPlane {
    /// Lists messages across the signed-in user's mailbox.
    pub async fn list_messages(&self, query: &MessageQuery) -> GraphResult<Value> {
        self.query_messages("/me/messages".to_string(), query).await
    }

    /// Lists messages in one folder (regular or search folder).
    pub async fn list_folder_messages(
        &self,
        folder_id: &str,
        query: &MessageQuery,
    ) -> GraphResult<Value> {
        let path = format!("/me/mailFolders/{}/messages", segment("folder_id", folder_id)?);
        self.query_messages(path, query).await
    }

    async fn query_messages(&self, path: String, query: &MessageQuery) -> GraphResult<Value> {
        let top = query.top.unwrap_or(DEFAULT_MESSAGE_PAGE_SIZE).to_string();
        self.client()
            .get(&path)?
            .query("$top", &top)
            .query_opt("$filter", query.filter.as_deref())
            .query_opt("$orderby", query.orderby.as_deref())
            .query_opt("$select", query.select.as_deref())
            .send()
            .await
    }

    pub async fn create_draft(&self, request: &DraftRequest) -> GraphResult<Value> {
        let created = self
            .client()
            .post("/me/messages")?
            .json(&request.to_payload())
            .send()
            .await?;
        info!("created draft message");
        Ok(created)
    }

    pub async fn create_draft_in_folder(
        &self,
        folder_id: &str,
        request: &DraftRequest,
    ) -> GraphResult<Value> {
        let path = format!("/me/mailFolders/{}/messages", segment("folder_id", folder_id)?);
        let created = self
            .client()
            .post(&path)?
            .json(&request.to_payload())
            .send()
            .await?;
        info!(folder_id, "created draft message in folder");
        Ok(created)
    }

    /// Patches a message. At least one field must be supplied.
    pub async fn update_draft(&self, message_id: &str, update: &DraftUpdate) -> GraphResult<Value> {
        let path = message_path(message_id)?;
        let payload = update.to_payload();
        if payload.is_empty() {
            return Err(GraphError::invalid_input(
                "at least one field to update is required",
            ));
        }
        self.client()
            .patch(&path)?
            .json(&payload.into_value())
            .send()
            .await
    }

    pub async fn delete_message(&self, message_id: &str) -> GraphResult<Value> {
        let path = message_path(message_id)?;
        let result = self.client().delete(&path)?.send().await?;
        info!(message_id, "deleted message");
        Ok(result)
    }

    pub async fn copy_message(
        &self,
        message_id: &str,
        destination_folder_id: &str,
    ) -> GraphResult<Value> {
        self.relocate_message(message_id, destination_folder_id, "copy")
            .await
    }

    pub async fn move_message(
        &self,
        message_id: &str,
        destination_folder_id: &str,
    ) -> GraphResult<Value> {
        self.relocate_message(message_id, destination_folder_id, "move")
            .await
    }

    async fn relocate_message(
        &self,
        message_id: &str,
        destination_folder_id: &str,
        action: &str,
    ) -> GraphResult<Value> {
        let path = format!("{}/{action}", message_path(message_id)?);
        let destination = require_text("destination_folder_id", destination_folder_id)?;
        self.client()
            .post(&path)?
            .json(&json!({ "destinationId": destination }))
            .send()
            .await
    }

    pub async fn create_forward_draft(
        &self,
        message_id: &str,
        comment: &str,
        to_recipients: &[String],
    ) -> GraphResult<Value> {
        let path = format!("{}/createForward", message_path(message_id)?);
        self.client()
            .post(&path)?
            .json(&json!({ "comment": comment, "toRecipients": recipients(to_recipients) }))
            .send()
            .await
    }

    pub async fn create_reply_draft(&self, message_id: &str, comment: &str) -> GraphResult<Value> {
        self.comment_action(message_id, "createReply", comment).await
    }

    pub async fn create_reply_all_draft(
        &self,
        message_id: &str,
        comment: &str,
    ) -> GraphResult<Value> {
        self.comment_action(message_id, "createReplyAll", comment)
            .await
    }

    pub async fn reply_all(&self, message_id: &str, comment: &str) -> GraphResult<Value> {
        self.comment_action(message_id, "replyAll", comment).await
    }

    async fn comment_action(
        &self,
        message_id: &str,
        action: &str,
        comment: &str,
    ) -> GraphResult<Value> {
        let path = format!("{}/{action}", message_path(message_id)?);
        self.client()
            .post(&path)?
            .json(&json!({ "comment": comment }))
            .send()
            .await
    }

    /// Forwards a message immediately.
    pub async fn forward_message(
        &self,
        message_id: &str,
        to_recipients: &[String],
        comment: &str,
    ) -> GraphResult<Value> {
        if to_recipients.is_empty() {
            return Err(GraphError::invalid_input(
                "at least one recipient is required",
            ));
        }
        let path = format!("{}/forward", message_path(message_id)?);
        let result = self
            .client()
            .post(&path)?
            .json(&json!({ "comment": comment, "toRecipients": recipients(to_recipients) }))
            .send()
            .await?;
        info!(message_id, "forwarded message");
        Ok(result)
    }

    /// Replies to a message, overriding the recipients.
    pub async fn reply_with_recipients(
        &self,
        message_id: &str,
        comment: &str,
        to_recipients: &[EmailAddress],
    ) -> GraphResult<Value> {
        let path = format!("{}/reply", message_path(message_id)?);
        let body = json!({
            "message": { "toRecipients": named_recipients(to_recipients) },
            "comment": comment,
        });
        let result = self.client().post(&path)?.json(&body).send().await?;
        info!(message_id, "sent reply");
        Ok(result)
    }

    pub async fn send_draft(&self, message_id: &str) -> GraphResult<Value> {
        let path = format!("{}/send", message_path(message_id)?);
        let result = self.client().post(&path)?.send().await?;
        info!(message_id, "sent draft");
        Ok(result)
    }

    /// Permanently deletes a message, bypassing Deleted Items.
    pub async fn permanent_delete_message(
        &self,
        mailbox: &Mailbox,
        message_id: &str,
    ) -> GraphResult<Value> {
        let path = format!(
            "{}/messages/{}/permanentDelete",
            mailbox.prefix()?,
            segment("message_id", message_id)?
        );
        let result = self.client().post(&path)?.send().await?;
        info!(message_id, "permanently deleted message");
        Ok(result)
    }
}

fn message_path(message_id: &str) -> GraphResult<String> {
    Ok(format!("/me/messages/{}", segment("message_id", message_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_payload_defaults_importance_and_wraps_body() {
        let request = DraftRequest {
            subject: "Status".to_string(),
            body_content: "<p>hi</p>".to_string(),
            to_recipients: vec!["a@x.com".to_string()],
            ..DraftRequest::default()
        };

        assert_eq!(
            request.to_payload(),
            json!({
                "subject": "Status",
                "importance": "Normal",
                "body": { "contentType": "HTML", "content": "<p>hi</p>" },
                "toRecipients": [{ "emailAddress": { "address": "a@x.com" } }]
            })
        );
    }

    #[test]
    fn update_payload_maps_sender_fields() {
        let update = DraftUpdate {
            from: Some(EmailAddress::new("owner@x.com")),
            is_read: Some(false),
            ..DraftUpdate::default()
        };

        assert_eq!(
            update.to_payload().into_value(),
            json!({
                "isRead": false,
                "from": { "emailAddress": { "address": "owner@x.com" } }
            })
        );
    }

    #[test]
    fn empty_update_has_no_fields() {
        assert!(DraftUpdate::default().to_payload().is_empty());
    }
}
