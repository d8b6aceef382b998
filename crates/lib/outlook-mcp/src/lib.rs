//! MCP server implementation for outlook-mcp.
//!
//! This crate wires the Outlook Mail control plane into rmcp tool handlers,
//! resolves the caller's Graph token for every request, and exposes stdio and
//! streamable HTTP runners.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use axum::http::request::Parts;
use outlook_core::control::MailControlPlane;
use outlook_core::services::GraphClientProvider;
use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::tool::ToolRouter,
    service::RequestContext,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

const SERVER_INSTRUCTIONS: &str = r#"outlook-mcp exposes the Microsoft Graph Outlook Mail API as MCP tools.

Authentication:
- Over streamable HTTP, send the caller's Graph access token in `x-auth-token` or as
  `Authorization: Bearer <token>`. Without either, the server's configured token is used.
- A call without any token returns an error result with kind `missing_auth`.

Tool groups (all prefixed `outlookMail_`):
- Messages and drafts: `list_messages`, `create_draft`, `update_draft`, `send_draft`,
  `reply_all`, `send_reply_custom`, `forward_message`, `copy_message`, `move_message`,
  `delete_draft`, `permanent_delete`, and the `create_*_draft` helpers.
- Folders: `list_folders`, `list_child_folders`, `get_mail_folder`, `create_mail_folder`,
  `create_child_folder`, `update_folder_display_name`, `copy_folder`, `move_folder`,
  `delete_folder`, `permanent_delete_folder`, `get_folder_delta`.
- Search folders: `create_mail_search_folder`, `update_mail_search_folder`, and the shared
  get/delete/messages tools.
- Inbox rules: `list_inbox_rules`, `get_inbox_rule_by_id`, `create_message_rule`,
  `update_message_rule`, `delete_message_rule`.
- Focused Inbox: `list_inference_overrides`, `update_inference_override`,
  `delete_inference_override`.
- Attachments: `list_attachments`, `get_attachment`, `download_attachment`, `add_attachment`,
  `upload_large_attachment`, `delete_attachment`.

Notes:
- Results are the Graph JSON response. Calls that return no content yield `{"success": true}`.
- Failures set `isError` and return `{"error", "kind", "status", "details"}`.
- File paths for attachments are resolved on the server host.
- `health` returns `ok`."#;

/// MCP server wrapper around the Graph client provider and tool routers.
#[derive(Clone)]
pub struct OutlookMcp {
    tool_router: ToolRouter<Self>,
    provider: Arc<GraphClientProvider>,
}

impl OutlookMcp {
    /// Creates a new server owning `provider`.
    #[must_use]
    pub fn new(provider: GraphClientProvider) -> Self {
        Self::with_provider(Arc::new(provider))
    }

    /// Creates a new server using a shared provider handle.
    #[must_use]
    pub fn with_provider(provider: Arc<GraphClientProvider>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_messages()
            + Self::tool_router_folders()
            + Self::tool_router_search_folders()
            + Self::tool_router_rules()
            + Self::tool_router_focused_inbox()
            + Self::tool_router_attachments();
        Self {
            tool_router,
            provider,
        }
    }

    /// Builds the control plane for one call, authenticated as its caller.
    ///
    /// The streamable HTTP transport attaches the HTTP request parts to every
    /// request; over stdio there are none and the default token applies.
    pub(crate) fn mail_for(&self, context: &RequestContext<RoleServer>) -> MailControlPlane {
        let token = context
            .extensions
            .get::<Parts>()
            .and_then(|parts| helpers::token_from_headers(&parts.headers));
        self.provider.control(token)
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl OutlookMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for OutlookMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use outlook_core::client::GraphConfig;

    use super::*;

    fn server() -> OutlookMcp {
        let provider = GraphClientProvider::new(GraphConfig::default()).expect("provider");
        OutlookMcp::new(provider)
    }

    #[test]
    fn registers_every_outlook_tool() {
        let tools = server().tool_router.list_all();
        let outlook_tools = tools
            .iter()
            .filter(|tool| tool.name.starts_with("outlookMail_"))
            .count();

        assert_eq!(outlook_tools, 47);
        assert_eq!(tools.len(), 48);
        assert!(tools.iter().any(|tool| tool.name == "health"));
    }

    #[test]
    fn alias_tools_are_registered() {
        let router = server().tool_router;
        for name in [
            "outlookMail_list_messages_from_folder",
            "outlookMail_get_messages_from_folder",
            "outlookMail_get_mail_search_folder",
            "outlookMail_delete_mail_search_folder",
            "outlookMail_permanent_delete_mail_search_folder",
        ] {
            assert!(router.has_route(name), "missing tool {name}");
        }
    }

    #[test]
    fn server_info_enables_tools() {
        let info = server().get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some_and(|text| text.contains("x-auth-token")));
    }
}
