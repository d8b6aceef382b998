use outlook_core::control::{Mailbox, SearchFolderRequest, SearchFolderUpdate};
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

use crate::tools::folders::FolderIdParams;
use crate::tools::messages::ListMessagesParams;
use crate::{OutlookMcp, helpers};

/// Parameters for creating a search folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateSearchFolderParams {
    pub parent_folder_id: String,
    pub display_name: String,
    /// Search subfolders of the source folders too.
    pub include_nested_folders: bool,
    /// Folder ids to search.
    pub source_folder_ids: Vec<String>,
    /// OData filter, e.g. `contains(subject, 'weekly digest')`.
    pub filter_query: String,
}

/// Parameters for updating a search folder. At least one field is required.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSearchFolderParams {
    #[serde(rename = "folder_id")]
    pub folder_id: String,
    pub display_name: Option<String>,
    pub include_nested_folders: Option<bool>,
    pub source_folder_ids: Option<Vec<String>>,
    pub filter_query: Option<String>,
}

/// Parameters for listing messages in a folder.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FolderMessagesParams {
    pub folder_id: String,
    #[serde(flatten)]
    pub query: ListMessagesParams,
}

impl OutlookMcp {
    async fn folder_messages(
        &self,
        params: FolderMessagesParams,
        context: &RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let query = params.query.into_query();
        let result = self
            .mail_for(context)
            .list_folder_messages(&params.folder_id, &query)
            .await;
        helpers::into_tool_result(result)
    }
}

#[tool_router(router = tool_router_search_folders, vis = "pub")]
impl OutlookMcp {
    #[tool(
        name = "outlookMail_create_mail_search_folder",
        description = "Create a search folder that collects messages matching an OData filter across source folders."
    )]
    async fn create_mail_search_folder(
        &self,
        Parameters(params): Parameters<CreateSearchFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = SearchFolderRequest {
            display_name: params.display_name,
            include_nested_folders: params.include_nested_folders,
            source_folder_ids: params.source_folder_ids,
            filter_query: params.filter_query,
        };
        let result = self
            .mail_for(&context)
            .create_search_folder(&params.parent_folder_id, &request)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_get_mail_search_folder",
        description = "Fetch a search folder by id."
    )]
    async fn get_mail_search_folder(
        &self,
        Parameters(params): Parameters<FolderIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).get_folder(&params.folder_id).await)
    }

    #[tool(
        name = "outlookMail_update_mail_search_folder",
        description = "Update a search folder's name, scope, sources or filter. Only supplied fields are changed."
    )]
    async fn update_mail_search_folder(
        &self,
        Parameters(params): Parameters<UpdateSearchFolderParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let update = SearchFolderUpdate {
            display_name: params.display_name,
            include_nested_folders: params.include_nested_folders,
            source_folder_ids: params.source_folder_ids,
            filter_query: params.filter_query,
        };
        let result = self
            .mail_for(&context)
            .update_search_folder(&params.folder_id, &update)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_delete_mail_search_folder",
        description = "Delete a search folder. Messages in its source folders are not affected."
    )]
    async fn delete_mail_search_folder(
        &self,
        Parameters(params): Parameters<FolderIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).delete_folder(&params.folder_id).await)
    }

    #[tool(
        name = "outlookMail_permanent_delete_mail_search_folder",
        description = "Permanently delete a search folder."
    )]
    async fn permanent_delete_mail_search_folder(
        &self,
        Parameters(params): Parameters<FolderIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .permanent_delete_folder(&Mailbox::Me, &params.folder_id)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_get_messages_from_folder",
        description = "List messages in a mail folder or search folder with optional OData filter, ordering and field selection."
    )]
    async fn get_messages_from_folder(
        &self,
        Parameters(params): Parameters<FolderMessagesParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.folder_messages(params, &context).await
    }

    #[tool(
        name = "outlookMail_list_messages_from_folder",
        description = "List messages in a mail folder with optional OData filter, ordering and field selection."
    )]
    async fn list_messages_from_folder(
        &self,
        Parameters(params): Parameters<FolderMessagesParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.folder_messages(params, &context).await
    }
}
