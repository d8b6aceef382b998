use serde_json::{Value, json};
use tracing::info;

use crate::control::{MailControlPlane, Mailbox, require_text, segment};
use crate::error::GraphResult;

pub const DEFAULT_DELTA_PAGE_SIZE: u32 = 2;

impl MailControlPlane {
    pub async fn list_folders(&self, include_hidden: bool) -> GraphResult<Value> {
        let request = self.client().get("/me/mailFolders")?;
        let request = if include_hidden {
            request.query("includeHiddenFolders", "true")
        } else {
            request
        };
        request.send().await
    }

    /// Fetches one folder. Search folders share this endpoint.
    pub async fn get_folder(&self, folder_id: &str) -> GraphResult<Value> {
        self.client().get(&folder_path(folder_id)?)?.send().await
    }

    pub async fn create_folder(&self, display_name: &str, is_hidden: bool) -> GraphResult<Value> {
        let body = folder_body(display_name, is_hidden)?;
        let created = self
            .client()
            .post("/me/mailFolders")?
            .json(&body)
            .send()
            .await?;
        info!(display_name, "created mail folder");
        Ok(created)
    }

    pub async fn list_child_folders(
        &self,
        folder_id: &str,
        include_hidden: bool,
    ) -> GraphResult<Value> {
        let path = format!("{}/childFolders", folder_path(folder_id)?);
        let request = self.client().get(&path)?;
        let request = if include_hidden {
            request.query("includeHiddenFolders", "true")
        } else {
            request
        };
        request.send().await
    }

    pub async fn create_child_folder(
        &self,
        parent_folder_id: &str,
        display_name: &str,
        is_hidden: bool,
    ) -> GraphResult<Value> {
        let path = format!("{}/childFolders", folder_path(parent_folder_id)?);
        let body = folder_body(display_name, is_hidden)?;
        let created = self.client().post(&path)?.json(&body).send().await?;
        info!(parent_folder_id, display_name, "created child mail folder");
        Ok(created)
    }

    pub async fn update_folder_display_name(
        &self,
        folder_id: &str,
        display_name: &str,
    ) -> GraphResult<Value> {
        let path = folder_path(folder_id)?;
        let display_name = require_text("display_name", display_name)?;
        self.client()
            .patch(&path)?
            .json(&json!({ "displayName": display_name }))
            .send()
            .await
    }

    /// Deletes a folder (moves it to Deleted Items). Search folders share this endpoint.
    pub async fn delete_folder(&self, folder_id: &str) -> GraphResult<Value> {
        let result = self.client().delete(&folder_path(folder_id)?)?.send().await?;
        info!(folder_id, "deleted mail folder");
        Ok(result)
    }

    pub async fn copy_folder(
        &self,
        folder_id: &str,
        destination_folder_id: &str,
    ) -> GraphResult<Value> {
        self.relocate_folder(folder_id, destination_folder_id, "copy")
            .await
    }

    pub async fn move_folder(
        &self,
        folder_id: &str,
        destination_folder_id: &str,
    ) -> GraphResult<Value> {
        self.relocate_folder(folder_id, destination_folder_id, "move")
            .await
    }

    async fn relocate_folder(
        &self,
        folder_id: &str,
        destination_folder_id: &str,
        action: &str,
    ) -> GraphResult<Value> {
        let path = format!("{}/{action}", folder_path(folder_id)?);
        let destination = require_text("destination_folder_id", destination_folder_id)?;
        let result = self
            .client()
            .post(&path)?
            .json(&json!({ "destinationId": destination }))
            .send()
            .await?;
        info!(folder_id, destination, action, "relocated mail folder");
        Ok(result)
    }

    /// Returns folder changes, paging `max_page_size` folders at a time.
    pub async fn folder_delta(&self, max_page_size: Option<u32>) -> GraphResult<Value> {
        let page_size = max_page_size.unwrap_or(DEFAULT_DELTA_PAGE_SIZE);
        self.client()
            .get("/me/mailFolders/delta")?
            .header("Prefer", format!("odata.maxpagesize={page_size}"))
            .send()
            .await
    }

    /// Permanently deletes a folder and its contents.
    pub async fn permanent_delete_folder(
        &self,
        mailbox: &Mailbox,
        folder_id: &str,
    ) -> GraphResult<Value> {
        let path = format!(
            "{}/mailFolders/{}/permanentDelete",
            mailbox.prefix()?,
            segment("folder_id", folder_id)?
        );
        let result = self.client().post(&path)?.send().await?;
        info!(folder_id, "permanently deleted mail folder");
        Ok(result)
    }
}

pub(crate) fn folder_path(folder_id: &str) -> GraphResult<String> {
    Ok(format!("/me/mailFolders/{}", segment("folder_id", folder_id)?))
}

fn folder_body(display_name: &str, is_hidden: bool) -> GraphResult<Value> {
    let display_name = require_text("display_name", display_name)?;
    Ok(json!({ "displayName": display_name, "isHidden": is_hidden }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_path_encodes_well_known_names() {
        assert_eq!(folder_path("inbox").unwrap(), "/me/mailFolders/inbox");
        assert!(folder_path("").is_err());
    }

    #[test]
    fn folder_body_requires_a_name() {
        assert_eq!(
            folder_body("Receipts", false).unwrap(),
            json!({ "displayName": "Receipts", "isHidden": false })
        );
        assert_eq!(folder_body(" ", true).unwrap_err().kind(), "invalid_input");
    }
}
