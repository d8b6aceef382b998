use outlook_core::control::Mailbox;
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

use crate::{OutlookMcp, helpers};

/// Parameters for listing top-level mail folders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListFoldersParams {
    /// Include hidden folders (default true).
    pub include_hidden: Option<bool>,
}

/// Parameters naming a single mail folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FolderIdParams {
    /// Folder id or well-known name such as `inbox`.
    pub folder_id: String,
}

/// Parameters for creating a top-level mail folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateFolderParams {
    pub display_name: String,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Parameters for listing child folders.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ChildFolderParams {
    pub folder_id: String,
    /// Include hidden child folders (default false).
    #[serde(default)]
    pub include_hidden: bool,
}

/// Parameters for creating a child folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateChildFolderParams {
    pub parent_folder_id: String,
    pub display_name: String,
    #[serde(default)]
    pub is_hidden: bool,
}

/// Parameters for renaming a folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RenameFolderParams {
    pub folder_id: String,
    pub display_name: String,
}

/// Parameters for copying or moving a folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RelocateFolderParams {
    pub folder_id: String,
    /// Destination folder id or well-known name.
    pub destination_id: String,
}

/// Parameters for the folder delta query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FolderDeltaParams {
    /// Folders per page (default 2).
    pub max_pagesize: Option<u32>,
}

/// Parameters for permanently deleting a folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PermanentDeleteFolderParams {
    /// User id or principal name; the signed-in user when omitted.
    pub user_id: Option<String>,
    pub folder_id: String,
}

#[tool_router(router = tool_router_folders, vis = "pub")]
impl OutlookMcp {
    #[tool(
        name = "outlookMail_list_folders",
        description = "List the signed-in user's top-level mail folders."
    )]
    async fn list_folders(
        &self,
        Parameters(params): Parameters<ListFoldersParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let include_hidden = params.include_hidden.unwrap_or(true);
        helpers::into_tool_result(self.mail_for(&context).list_folders(include_hidden).await)
    }

    #[tool(
        name = "outlookMail_get_mail_folder",
        description = "Fetch a mail folder by id or well-known name."
    )]
    async fn get_mail_folder(
        &self,
        Parameters(params): Parameters<FolderIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).get_folder(&params.folder_id).await)
    }

    #[tool(
        name = "outlookMail_create_mail_folder",
        description = "Create a top-level mail folder."
    )]
    async fn create_mail_folder(
        &self,
        Parameters(params): Parameters<CreateFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .create_folder(&params.display_name, params.is_hidden)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_list_child_folders",
        description = "List the child folders of a mail folder."
    )]
    async fn list_child_folders(
        &self,
        Parameters(params): Parameters<ChildFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .list_child_folders(&params.folder_id, params.include_hidden)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_create_child_folder",
        description = "Create a mail folder under an existing parent folder."
    )]
    async fn create_child_folder(
        &self,
        Parameters(params): Parameters<CreateChildFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .create_child_folder(&params.parent_folder_id, &params.display_name, params.is_hidden)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_update_folder_display_name",
        description = "Rename a mail folder."
    )]
    async fn update_folder_display_name(
        &self,
        Parameters(params): Parameters<RenameFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .update_folder_display_name(&params.folder_id, &params.display_name)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_delete_folder",
        description = "Delete a mail folder (moves it to Deleted Items)."
    )]
    async fn delete_folder(
        &self,
        Parameters(params): Parameters<FolderIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).delete_folder(&params.folder_id).await)
    }

    #[tool(
        name = "outlookMail_copy_folder",
        description = "Copy a mail folder and its contents into another folder."
    )]
    async fn copy_folder(
        &self,
        Parameters(params): Parameters<RelocateFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .copy_folder(&params.folder_id, &params.destination_id)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_move_folder",
        description = "Move a mail folder and its contents into another folder."
    )]
    async fn move_folder(
        &self,
        Parameters(params): Parameters<RelocateFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .move_folder(&params.folder_id, &params.destination_id)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_get_folder_delta",
        description = "Get mail folders added, updated or deleted since the last sync, one page at a time."
    )]
    async fn get_folder_delta(
        &self,
        Parameters(params): Parameters<FolderDeltaParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).folder_delta(params.max_pagesize).await)
    }

    #[tool(
        name = "outlookMail_permanent_delete_folder",
        description = "Permanently delete a mail folder and everything in it. Targets `user_id`'s mailbox when given."
    )]
    async fn permanent_delete_folder(
        &self,
        Parameters(params): Parameters<PermanentDeleteFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let mailbox = Mailbox::from_user(params.user_id);
        let result = self
            .mail_for(&context)
            .permanent_delete_folder(&mailbox, &params.folder_id)
            .await;
        helpers::into_tool_result(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn folder_flags_default_like_graph_clients_expect() {
        let list: ListFoldersParams = serde_json::from_value(json!({})).expect("params");
        let children: ChildFolderParams =
            serde_json::from_value(json!({ "folder_id": "inbox" })).expect("params");
        let create: CreateFolderParams =
            serde_json::from_value(json!({ "display_name": "Receipts" })).expect("params");

        assert!(list.include_hidden.unwrap_or(true));
        assert!(!children.include_hidden);
        assert!(!create.is_hidden);
    }
}
