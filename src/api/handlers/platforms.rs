use axum::Json;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PLATFORM_TAG;
use crate::api::dto::{DelayUnitResponse, PlatformResponse, PlatformsResponse};
use crate::external::webhook::Platform;
use crate::models::DelayUnit;
use crate::services::validation::{MAX_DELAY, MIN_DELAY};
use crate::state::AppState;

pub fn platform_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_platforms))
}

/// GET /api/platforms - Supported platforms and delay options
#[utoipa::path(
    get,
    path = "/platforms",
    tag = PLATFORM_TAG,
    responses(
        (status = 200, description = "Registry listing", body = PlatformsResponse)
    )
)]
async fn list_platforms() -> Json<PlatformsResponse> {
    Json(PlatformsResponse {
        platforms: Platform::ALL
            .iter()
            .map(|p| PlatformResponse::from(p.spec()))
            .collect(),
        delay_units: DelayUnit::ALL
            .iter()
            .map(|unit| DelayUnitResponse {
                id: *unit,
                label: unit.label().to_string(),
            })
            .collect(),
        min_delay: MIN_DELAY,
        max_delay: MAX_DELAY,
    })
}
