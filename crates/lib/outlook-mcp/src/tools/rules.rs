use outlook_core::control::MessageRuleFields;
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
use serde_json::Value;

use crate::{OutlookMcp, helpers};

/// Parameters for creating an inbox rule.
///
/// `actions` is a Graph `messageRuleActions` object (e.g. `moveToFolder`,
/// `markAsRead`, `forwardTo`); `conditions` and `exceptions` are
/// `messageRulePredicates` objects (e.g. `fromAddresses`, `subjectContains`).
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleParams {
    pub display_name: String,
    /// Execution order; lower values run first.
    pub sequence: i64,
    pub is_enabled: Option<bool>,
    pub conditions: Option<Value>,
    pub actions: Value,
    pub exceptions: Option<Value>,
}

/// Parameters for updating an inbox rule. At least one field is required.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRuleParams {
    #[serde(rename = "rule_id")]
    pub rule_id: String,
    pub display_name: Option<String>,
    pub sequence: Option<i64>,
    pub is_enabled: Option<bool>,
    /// An empty object matches every message.
    pub conditions: Option<Value>,
    pub actions: Option<Value>,
    pub exceptions: Option<Value>,
}

/// Parameters naming a single inbox rule.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RuleIdParams {
    pub rule_id: String,
}

#[tool_router(router = tool_router_rules, vis = "pub")]
impl OutlookMcp {
    #[tool(
        name = "outlookMail_list_inbox_rules",
        description = "List the inbox message rules."
    )]
    async fn list_inbox_rules(
        &self,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).list_rules().await)
    }

    #[tool(
        name = "outlookMail_get_inbox_rule_by_id",
        description = "Fetch an inbox message rule by id."
    )]
    async fn get_inbox_rule_by_id(
        &self,
        Parameters(params): Parameters<RuleIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).get_rule(&params.rule_id).await)
    }

    #[tool(
        name = "outlookMail_create_message_rule",
        description = "Create an inbox message rule. `displayName`, `sequence` and `actions` are required."
    )]
    async fn create_message_rule(
        &self,
        Parameters(params): Parameters<CreateRuleParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let fields = MessageRuleFields {
            display_name: Some(params.display_name),
            sequence: Some(params.sequence),
            is_enabled: params.is_enabled,
            conditions: params.conditions,
            actions: Some(params.actions),
            exceptions: params.exceptions,
        };
        helpers::into_tool_result(self.mail_for(&context).create_rule(&fields).await)
    }

    #[tool(
        name = "outlookMail_update_message_rule",
        description = "Update an inbox message rule. Only supplied fields are changed."
    )]
    async fn update_message_rule(
        &self,
        Parameters(params): Parameters<UpdateRuleParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let fields = MessageRuleFields {
            display_name: params.display_name,
            sequence: params.sequence,
            is_enabled: params.is_enabled,
            conditions: params.conditions,
            actions: params.actions,
            exceptions: params.exceptions,
        };
        let result = self
            .mail_for(&context)
            .update_rule(&params.rule_id, &fields)
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_delete_message_rule",
        description = "Delete an inbox message rule."
    )]
    async fn delete_message_rule(
        &self,
        Parameters(params): Parameters<RuleIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).delete_rule(&params.rule_id).await)
    }
}
