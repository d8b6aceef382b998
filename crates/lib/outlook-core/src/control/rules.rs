use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::control::{MailControlPlane, segment};
use crate::error::{GraphError, GraphResult};
use crate::payload::Payload;

const RULES_PATH: &str = "/me/mailFolders/inbox/messageRules";

/// Inbox rule fields. `conditions`, `actions` and `exceptions` are Graph
/// `messageRulePredicates` / `messageRuleActions` objects forwarded verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageRuleFields {
    pub display_name: Option<String>,
    pub sequence: Option<i64>,
    pub is_enabled: Option<bool>,
    pub conditions: Option<Value>,
    pub actions: Option<Value>,
    pub exceptions: Option<Value>,
}

impl MessageRuleFields {
    fn to_payload(&self) -> Payload {
        Payload::new()
            .optional("displayName", self.display_name.clone())
            .optional("sequence", self.sequence)
            .optional("isEnabled", self.is_enabled)
            .optional("conditions", present(self.conditions.as_ref()))
            .optional("actions", present(self.actions.as_ref()))
            .optional("exceptions", present(self.exceptions.as_ref()))
    }

    fn missing_for_create(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self
            .display_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
        {
            missing.push("displayName");
        }
        if self.sequence.is_none() {
            missing.push("sequence");
        }
        if present(self.actions.as_ref()).is_none() {
            missing.push("actions");
        }
        missing
    }
}

impl MailControlPlane {
    pub async fn list_rules(&self) -> GraphResult<Value> {
        self.client().get(RULES_PATH)?.send().await
    }

    pub async fn get_rule(&self, rule_id: &str) -> GraphResult<Value> {
        self.client().get(&rule_path(rule_id)?)?.send().await
    }

    /// Creates an inbox rule; `displayName`, `sequence` and `actions` are required.
    pub async fn create_rule(&self, fields: &MessageRuleFields) -> GraphResult<Value> {
        let missing = fields.missing_for_create();
        if !missing.is_empty() {
            return Err(GraphError::invalid_input(format!(
                "missing required rule fields: {}",
                missing.join(", ")
            )));
        }
        let created = self
            .client()
            .post(RULES_PATH)?
            .json(&fields.to_payload().into_value())
            .send()
            .await?;
        info!("created inbox rule");
        Ok(created)
    }

    pub async fn update_rule(
        &self,
        rule_id: &str,
        fields: &MessageRuleFields,
    ) -> GraphResult<Value> {
        let path = rule_path(rule_id)?;
        let payload = fields.to_payload();
        if payload.is_empty() {
            return Err(GraphError::invalid_input(
                "at least one rule field is required",
            ));
        }
        let updated = self
            .client()
            .patch(&path)?
            .json(&payload.into_value())
            .send()
            .await?;
        info!(rule_id, "updated inbox rule");
        Ok(updated)
    }

    pub async fn delete_rule(&self, rule_id: &str) -> GraphResult<Value> {
        let result = self.client().delete(&rule_path(rule_id)?)?.send().await?;
        info!(rule_id, "deleted inbox rule");
        Ok(result)
    }
}

/// JSON `null` counts as not supplied.
fn present(value: Option<&Value>) -> Option<Value> {
    value.filter(|value| !value.is_null()).cloned()
}

fn rule_path(rule_id: &str) -> GraphResult<String> {
    Ok(format!("{RULES_PATH}/{}", segment("rule_id", rule_id)?))
}
