//! Immediate send DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/send-message`.
///
/// Missing fields deserialize as empty strings and are rejected by the
/// handler's own checks.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SendMessageRequest {
    #[schema(example = "discord")]
    pub platform: String,
    #[schema(example = "https://discord.com/api/webhooks/123456789012345678/abcDEF_ghi-jkl")]
    pub webhook_url: String,
    #[schema(example = "Deploy finished")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendMessageResponse {
    #[schema(example = true)]
    pub success: bool,
}

impl SendMessageResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
