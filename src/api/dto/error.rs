//! Error response DTOs.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Standard error response format.
///
/// The human readable message is serialized as `error` so that browser
/// clients can read `body.error` directly.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "error": "Slack API Error: no_webhook",
    "code": "UPSTREAM_ERROR",
    "request_id": "6f1c2d3e-0000-4000-8000-000000000000"
}))]
pub struct ErrorResponse {
    #[serde(rename = "error")]
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
