//! Scheduled dispatch DTOs.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationFieldError;
use crate::external::webhook::Platform;
use crate::services::DispatchTicket;

/// Returned when a submission passes validation and its countdown starts
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchAcceptedResponse {
    pub submission_id: Uuid,
    pub platform: Platform,
    /// Full wait before the webhook is called
    pub total_ms: u64,
    pub remaining_seconds: u64,
}

impl From<&DispatchTicket> for DispatchAcceptedResponse {
    fn from(ticket: &DispatchTicket) -> Self {
        Self {
            submission_id: ticket.submission_id,
            platform: ticket.platform,
            total_ms: ticket.total_ms,
            remaining_seconds: ticket.remaining_seconds,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelDispatchResponse {
    pub submission_id: Uuid,
    pub cancelled: bool,
}

/// Field-level result of a validation pass.
///
/// `errors` holds at most one entry per field, sorted by field name.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<ValidationFieldError>,
}
