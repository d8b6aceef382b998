//! MCP tool modules.
//!
//! Tools are grouped by Graph resource: messages and drafts, mail folders,
//! search folders, inbox rules, Focused Inbox overrides, and attachments.

pub mod attachments;
pub mod focused_inbox;
pub mod folders;
pub mod messages;
pub mod rules;
pub mod search_folders;
