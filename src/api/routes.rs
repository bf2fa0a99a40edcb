//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{REQUEST_ID_HEADER, logging_middleware, request_id_middleware};
use crate::config::ServerConfig;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. CORS, when origins are configured
/// 4. Response compression
/// 5. Request timeout, on every route except `/api/send-message`
///
/// # Routes
/// - `/api/send-message` - Immediate delivery
/// - `/api/validate`, `/api/dispatches` - Delayed delivery
/// - `/api/platforms` - Registry listing
/// - `/api/notifications` - Outcome notifications
/// - `/health` - Probes
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState) -> Router {
    let server = state.settings.server.clone();

    // Bounds time to response headers; SSE bodies keep streaming
    let timeout = TimeoutLayer::new(server.request_timeout());

    // send-message bounds its own webhook call and reports it as a 500
    let api_routes = OpenApiRouter::new()
        .merge(handlers::dispatches::dispatch_routes())
        .merge(handlers::platforms::platform_routes())
        .merge(handlers::notifications::notification_routes())
        .layer(timeout.clone())
        .merge(handlers::messages::message_routes());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes().layer(timeout))
        .split_for_parts();

    let router = router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        // Event streams are skipped by the default compression predicate
        .layer(CompressionLayer::new());

    let router = match cors_layer(&server) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router
        // Middleware is applied in reverse order - last added runs first
        // So logging runs after request_id has set the ID
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Builds the CORS layer for a browser front-end.
///
/// Returns `None` when no origins are configured, leaving the API
/// same-origin only.
fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    if server.cors_allowed_origins.is_empty() {
        return None;
    }

    let origin = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
            .max_age(std::time::Duration::from_secs(3600)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::external::webhook::WebhookDispatcher;
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(settings: Settings) -> Router {
        create_router(AppState::with_dispatcher(
            settings,
            Arc::new(WebhookDispatcher::new(reqwest::Client::new())),
        ))
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let response = app(Settings::default())
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        for path in [
            "/api/send-message",
            "/api/validate",
            "/api/dispatches",
            "/api/dispatches/current",
            "/api/platforms",
            "/api/notifications",
            "/api/notifications/{id}",
            "/health",
        ] {
            assert!(doc["paths"].get(path).is_some(), "missing {path}");
        }
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let response = app(Settings::default())
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[test]
    fn test_cors_disabled_without_origins() {
        assert!(cors_layer(&ServerConfig::default()).is_none());

        let server = ServerConfig {
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        assert!(cors_layer(&server).is_some());
    }
}
