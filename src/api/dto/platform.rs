//! Platform registry DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::external::webhook::{Platform, PlatformSpec};
use crate::models::DelayUnit;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResponse {
    pub id: Platform,
    #[schema(example = "Discord")]
    pub label: String,
    #[schema(example = 2000)]
    pub message_limit: usize,
    /// Regular expression a webhook URL must match in full
    pub url_pattern: String,
}

impl From<&PlatformSpec> for PlatformResponse {
    fn from(spec: &PlatformSpec) -> Self {
        Self {
            id: spec.platform,
            label: spec.label.to_string(),
            message_limit: spec.message_limit,
            url_pattern: spec.url_pattern().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DelayUnitResponse {
    pub id: DelayUnit,
    #[schema(example = "Minutes")]
    pub label: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformsResponse {
    pub platforms: Vec<PlatformResponse>,
    pub delay_units: Vec<DelayUnitResponse>,
    pub min_delay: u32,
    pub max_delay: u32,
}
