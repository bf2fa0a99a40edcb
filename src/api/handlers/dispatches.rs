//! Delayed submissions.
//!
//! One submission can be live at a time; its countdown and outcome are
//! owned by the scheduler, not by the request that created it.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::DISPATCH_TAG;
use crate::api::dto::{
    CancelDispatchResponse, DispatchAcceptedResponse, ErrorResponse, ValidateResponse,
};
use crate::error::{AppResult, field_errors};
use crate::models::RawSubmission;
use crate::services::{SchedulerState, validation};
use crate::state::AppState;
use crate::utils::validate::AppJson;

/// Routes:
/// - POST /validate                - Dry-run the form checks
/// - POST /dispatches              - Schedule a submission
/// - GET /dispatches/current       - Current scheduler state
/// - DELETE /dispatches/current    - Cancel the scheduled submission
pub fn dispatch_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(validate_submission))
        .routes(routes!(create_dispatch))
        .routes(routes!(current_dispatch, cancel_dispatch))
}

/// POST /api/validate - Validate a form without scheduling it
///
/// Always answers 200; `valid` tells whether the form would be accepted.
/// Cheap enough to call on every debounced edit.
#[utoipa::path(
    post,
    path = "/validate",
    tag = DISPATCH_TAG,
    request_body = RawSubmission,
    responses(
        (status = 200, description = "Validation result", body = ValidateResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse)
    )
)]
async fn validate_submission(AppJson(raw): AppJson<RawSubmission>) -> Json<ValidateResponse> {
    let response = match validation::validate(&raw) {
        Ok(_) => ValidateResponse {
            valid: true,
            errors: Vec::new(),
        },
        Err(errors) => ValidateResponse {
            valid: false,
            errors: field_errors(&errors),
        },
    };
    Json(response)
}

/// POST /api/dispatches - Schedule a message
#[utoipa::path(
    post,
    path = "/dispatches",
    tag = DISPATCH_TAG,
    request_body = RawSubmission,
    responses(
        (status = 202, description = "Countdown started", body = DispatchAcceptedResponse),
        (status = 400, description = "Field errors", body = ErrorResponse),
        (status = 409, description = "Another message is already scheduled", body = ErrorResponse)
    )
)]
async fn create_dispatch(
    State(state): State<AppState>,
    AppJson(raw): AppJson<RawSubmission>,
) -> AppResult<(StatusCode, Json<DispatchAcceptedResponse>)> {
    let ticket = state.services.scheduler.submit(&raw)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(DispatchAcceptedResponse::from(&ticket)),
    ))
}

/// GET /api/dispatches/current - Scheduler state, including the countdown
#[utoipa::path(
    get,
    path = "/dispatches/current",
    tag = DISPATCH_TAG,
    responses(
        (status = 200, description = "Current state", body = SchedulerState)
    )
)]
async fn current_dispatch(State(state): State<AppState>) -> Json<SchedulerState> {
    Json(state.services.scheduler.state())
}

/// DELETE /api/dispatches/current - Cancel before the webhook is called
#[utoipa::path(
    delete,
    path = "/dispatches/current",
    tag = DISPATCH_TAG,
    responses(
        (status = 200, description = "Cancelled", body = CancelDispatchResponse),
        (status = 404, description = "Nothing is scheduled", body = ErrorResponse),
        (status = 409, description = "Already sending", body = ErrorResponse)
    )
)]
async fn cancel_dispatch(State(state): State<AppState>) -> AppResult<Json<CancelDispatchResponse>> {
    let submission_id = state.services.scheduler.cancel()?;
    Ok(Json(CancelDispatchResponse {
        submission_id,
        cancelled: true,
    }))
}
