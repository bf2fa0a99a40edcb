//! Immediate message delivery.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::MESSAGE_TAG;
use crate::api::dto::{ErrorResponse, SendMessageRequest, SendMessageResponse};
use crate::error::{AppError, AppResult};
use crate::services::validation::check_send_request;
use crate::state::AppState;
use crate::utils::validate::AppJson;

pub fn message_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(send_message))
}

/// POST /api/send-message - Send a message right away
///
/// Checks run in order and stop at the first failure: platform, webhook URL
/// shape, empty message, message length. Upstream failures keep the
/// webhook's status code. A webhook that does not answer within the server
/// request timeout is reported as a connection failure.
#[utoipa::path(
    post,
    path = "/send-message",
    tag = MESSAGE_TAG,
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message delivered", body = SendMessageResponse),
        (status = 400, description = "Rejected before sending", body = ErrorResponse),
        (status = 500, description = "Webhook unreachable", body = ErrorResponse)
    )
)]
async fn send_message(
    State(state): State<AppState>,
    AppJson(request): AppJson<SendMessageRequest>,
) -> AppResult<Json<SendMessageResponse>> {
    let (platform, message) =
        check_send_request(&request.platform, &request.webhook_url, &request.message)?;

    let payload = platform.spec().build_payload(&message);
    let dispatch = state
        .services
        .dispatcher
        .dispatch(platform, &request.webhook_url, &payload);

    let outcome = tokio::time::timeout(state.settings.server.request_timeout(), dispatch)
        .await
        .map_err(|_| {
            tracing::warn!(platform = %platform, "Webhook did not answer in time");
            AppError::Network {
                message: format!("Failed to connect to {} API", platform.label()),
            }
        })?;
    outcome.into_result()?;

    Ok(Json(SendMessageResponse::ok()))
}
