use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::control::{MailControlPlane, segment};
use crate::error::GraphResult;

const OVERRIDES_PATH: &str = "/me/inferenceClassification/overrides";

/// Focused Inbox classification applied to a sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifyAs {
    #[default]
    Focused,
    Other,
}

impl ClassifyAs {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focused => "focused",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ClassifyAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MailControlPlane {
    pub async fn list_overrides(&self) -> GraphResult<Value> {
        self.client().get(OVERRIDES_PATH)?.send().await
    }

    pub async fn update_override(
        &self,
        override_id: &str,
        classify_as: ClassifyAs,
    ) -> GraphResult<Value> {
        let path = override_path(override_id)?;
        let updated = self
            .client()
            .patch(&path)?
            .json(&json!({ "classifyAs": classify_as.as_str() }))
            .send()
            .await?;
        info!(override_id, %classify_as, "updated focused inbox override");
        Ok(updated)
    }

    pub async fn delete_override(&self, override_id: &str) -> GraphResult<Value> {
        let result = self
            .client()
            .delete(&override_path(override_id)?)?
            .send()
            .await?;
        info!(override_id, "deleted focused inbox override");
        Ok(result)
    }
}

fn override_path(override_id: &str) -> GraphResult<String> {
    Ok(format!(
        "{OVERRIDES_PATH}/{}",
        segment("override_id", override_id)?
    ))
}
