use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::control::folders::folder_path;
use crate::control::{MailControlPlane, require_text};
use crate::error::{GraphError, GraphResult};
use crate::payload::Payload;

pub const MAIL_SEARCH_FOLDER_TYPE: &str = "microsoft.graph.mailSearchFolder";

/// Definition of a new search folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFolderRequest {
    pub display_name: String,
    pub include_nested_folders: bool,
    pub source_folder_ids: Vec<String>,
    /// OData filter, e.g. `contains(subject, 'weekly digest')`.
    pub filter_query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFolderUpdate {
    pub display_name: Option<String>,
    pub include_nested_folders: Option<bool>,
    pub source_folder_ids: Option<Vec<String>>,
    pub filter_query: Option<String>,
}

impl SearchFolderUpdate {
    fn to_payload(&self) -> Payload {
        Payload::new()
            .optional("displayName", self.display_name.clone())
            .optional("includeNestedFolders", self.include_nested_folders)
            .optional("sourceFolderIds", self.source_folder_ids.clone())
            .optional("filterQuery", self.filter_query.clone())
    }
}

impl MailControlPlane {
    pub async fn create_search_folder(
        &self,
        parent_folder_id: &str,
        request: &SearchFolderRequest,
    ) -> GraphResult<Value> {
        let path = format!("{}/childFolders", folder_path(parent_folder_id)?);
        let display_name = require_text("display_name", &request.display_name)?;
        let body = json!({
            "@odata.type": MAIL_SEARCH_FOLDER_TYPE,
            "displayName": display_name,
            "includeNestedFolders": request.include_nested_folders,
            "sourceFolderIds": request.source_folder_ids,
            "filterQuery": request.filter_query,
        });
        let created = self.client().post(&path)?.json(&body).send().await?;
        info!(parent_folder_id, display_name, "created search folder");
        Ok(created)
    }

    pub async fn update_search_folder(
        &self,
        folder_id: &str,
        update: &SearchFolderUpdate,
    ) -> GraphResult<Value> {
        let path = folder_path(folder_id)?;
        let payload = update.to_payload();
        if payload.is_empty() {
            return Err(GraphError::invalid_input(
                "at least one search folder field is required",
            ));
        }
        self.client()
            .patch(&path)?
            .json(&payload.into_value())
            .send()
            .await
    }
}
