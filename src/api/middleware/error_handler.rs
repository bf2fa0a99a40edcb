//! Error handler for converting AppError to HTTP responses.
//!
//! Every error becomes an [`ErrorResponse`] with the request ID attached
//! when one is in scope. Sources of internal errors are logged, never sent.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::current_request_id;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let body = match &self {
            AppError::Validation { field, reason } => {
                ErrorResponse::new(code, reason).with_details(json!({ "field": field }))
            }
            AppError::ValidationErrors { errors } => ErrorResponse::new(code, self.to_string())
                .with_details(json!({ "fields": errors })),
            AppError::UnsupportedPlatform { platform } => ErrorResponse::new(code, self.to_string())
                .with_details(json!({ "platform": platform })),
            AppError::Upstream { message, status } => {
                ErrorResponse::new(code, message).with_details(json!({ "status": status }))
            }
            AppError::Network { message } => ErrorResponse::new(code, message),
            AppError::Conflict { message } | AppError::BadRequest { message } => {
                ErrorResponse::new(code, message)
            }
            AppError::NotFound { entity, .. } => {
                ErrorResponse::new(code, format!("No {entity} found"))
            }
            AppError::Configuration { key, source } => {
                tracing::error!(key = %key, error = %source, "Configuration error");
                ErrorResponse::new(code, format!("Configuration error: {key}"))
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error");
                ErrorResponse::new(code, "An internal error occurred")
            }
        };

        let body = match current_request_id() {
            Some(id) => body.with_request_id(id),
            None => body,
        };

        (status, Json(body)).into_response()
    }
}

/// Maps an AppError variant to its HTTP status code.
///
/// Upstream failures mirror the webhook's own status.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::UnsupportedPlatform { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        AppError::Conflict { .. } => StatusCode::CONFLICT,
        AppError::Network { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::UnsupportedPlatform { .. } => "UNSUPPORTED_PLATFORM",
        AppError::Upstream { .. } => "UPSTREAM_ERROR",
        AppError::Network { .. } => "NETWORK_ERROR",
        AppError::Conflict { .. } => "CONFLICT",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}
