//! Outlook Mail operations, one method per Graph endpoint.
//!
//! Operations are grouped by resource: messages and drafts, mail folders,
//! search folders, inbox rules, Focused Inbox overrides, and attachments.

use std::borrow::Cow;

use crate::client::GraphClient;
use crate::error::{GraphError, GraphResult};

pub mod attachments;
pub mod focused_inbox;
pub mod folders;
pub mod messages;
pub mod rules;
pub mod search_folders;

pub use attachments::LargeAttachmentUpload;
pub use focused_inbox::ClassifyAs;
pub use messages::{DraftRequest, DraftUpdate, MessageQuery};
pub use rules::MessageRuleFields;
pub use search_folders::{SearchFolderRequest, SearchFolderUpdate};

/// Mailbox addressed by an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mailbox {
    /// The signed-in user (`/me`).
    #[default]
    Me,
    /// Another user by id or user principal name (`/users/{id}`).
    User(String),
}

impl Mailbox {
    /// Treats a missing or blank user id as the signed-in user.
    #[must_use]
    pub fn from_user(user_id: Option<String>) -> Self {
        match user_id {
            Some(user_id) if !user_id.trim().is_empty() => Self::User(user_id),
            _ => Self::Me,
        }
    }

    fn prefix(&self) -> GraphResult<String> {
        match self {
            Self::Me => Ok("/me".to_string()),
            Self::User(user_id) => Ok(format!("/users/{}", segment("user_id", user_id)?)),
        }
    }
}

/// Outlook Mail facade over a single authenticated client.
#[derive(Clone)]
pub struct MailControlPlane {
    client: GraphClient,
}

impl MailControlPlane {
    #[must_use]
    pub const fn new(client: GraphClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &GraphClient {
        &self.client
    }
}

/// Validates a required identifier and encodes it as one path segment.
pub(crate) fn segment<'a>(name: &str, value: &'a str) -> GraphResult<Cow<'a, str>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GraphError::invalid_input(format!("{name} is required")));
    }
    Ok(urlencoding::encode(trimmed))
}

pub(crate) fn require_text<'a>(name: &str, value: &'a str) -> GraphResult<&'a str> {
    if value.trim().is_empty() {
        return Err(GraphError::invalid_input(format!("{name} is required")));
    }
    Ok(value)
}
