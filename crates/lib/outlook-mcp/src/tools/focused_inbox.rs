use outlook_core::control::ClassifyAs;
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

/// Focused Inbox target for a sender.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassifyAsParam {
    #[default]
    Focused,
    Other,
}

impl From<ClassifyAsParam> for ClassifyAs {
    fn from(param: ClassifyAsParam) -> Self {
        match param {
            ClassifyAsParam::Focused => Self::Focused,
            ClassifyAsParam::Other => Self::Other,
        }
    }
}

/// Parameters for changing an override's classification.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateOverrideParams {
    pub override_id: String,
    /// `focused` (default) or `other`.
    #[serde(default)]
    pub classify_as: ClassifyAsParam,
}

/// Parameters naming a single override.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct OverrideIdParams {
    pub override_id: String,
}

#[tool_router(router = tool_router_focused_inbox, vis = "pub")]
impl OutlookMcp {
    #[tool(
        name = "outlookMail_list_inference_overrides",
        description = "List Focused Inbox overrides that always classify a sender as focused or other."
    )]
    async fn list_inference_overrides(
        &self,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::into_tool_result(self.mail_for(&context).list_overrides().await)
    }

    #[tool(
        name = "outlookMail_update_inference_override",
        description = "Change how messages from an overridden sender are classified."
    )]
    async fn update_inference_override(
        &self,
        Parameters(params): Parameters<UpdateOverrideParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .update_override(&params.override_id, params.classify_as.into())
            .await;
        helpers::into_tool_result(result)
    }

    #[tool(
        name = "outlookMail_delete_inference_override",
        description = "Delete a Focused Inbox override."
    )]
    async fn delete_inference_override(
        &self,
        Parameters(params): Parameters<OverrideIdParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .mail_for(&context)
            .delete_override(&params.override_id)
            .await;
        helpers::into_tool_result(result)
    }
}
