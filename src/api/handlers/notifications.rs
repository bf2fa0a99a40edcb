//! Notification API handlers.
//!
//! Exposes the notification store: current items, dismissal and a
//! server-sent event stream of changes.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::NOTIFICATION_TAG;
use crate::api::dto::ErrorResponse;
use crate::error::{AppError, AppResult};
use crate::models::{Notification, NotificationEvent};
use crate::state::AppState;

/// Routes:
/// - GET /notifications            - Visible notifications, newest first
/// - GET /notifications/stream     - Server-sent events
/// - DELETE /notifications/{id}    - Dismiss one notification
pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_notifications))
        .routes(routes!(notification_stream))
        .routes(routes!(dismiss_notification))
}

#[utoipa::path(
    get,
    path = "/notifications",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Visible notifications", body = Vec<Notification>)
    )
)]
async fn list_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.services.notifications.list())
}

/// DELETE /api/notifications/{id} - Dismiss a notification
#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    tag = NOTIFICATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Dismissed"),
        (status = 404, description = "Unknown notification", body = ErrorResponse)
    )
)]
async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.services.notifications.dismiss(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("notification", "id", id))
    }
}

fn to_sse_event(event: &NotificationEvent) -> Option<Event> {
    let name = match event {
        NotificationEvent::Added { .. } => "added",
        NotificationEvent::Dismissed { .. } => "dismissed",
    };
    Event::default().event(name).json_data(event).ok()
}

/// GET /api/notifications/stream - Live notification events
///
/// Each event is named `added` or `dismissed` and carries the JSON-encoded
/// [`NotificationEvent`]. Slow clients skip events they fell behind on.
#[utoipa::path(
    get,
    path = "/notifications/stream",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream", body = NotificationEvent)
    )
)]
async fn notification_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.services.notifications.subscribe()).filter_map(
        |event| match event {
            Ok(event) => to_sse_event(&event).map(Ok),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Notification stream subscriber lagged");
                None
            }
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_event_names() {
        let added = NotificationEvent::Added {
            notification: Notification::new(
                crate::models::NotificationKind::Success,
                "Message Sent",
                "ok",
            ),
        };
        assert!(to_sse_event(&added).is_some());
        assert!(to_sse_event(&NotificationEvent::Dismissed { id: Uuid::nil() }).is_some());
    }
}
