//! Outbound webhook delivery.
//!
//! Exactly one POST per call, no retries. Failures are returned as
//! [`DispatchOutcome::Failure`] rather than errors so the scheduler can turn
//! them into notifications.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::external::webhook::Platform;
use crate::models::DispatchOutcome;

/// Seam between the scheduler and the network
#[async_trait]
pub trait WebhookDispatch: Send + Sync {
    async fn dispatch(&self, platform: Platform, url: &str, payload: &Value) -> DispatchOutcome;
}

#[derive(Clone)]
pub struct WebhookDispatcher {
    client: Client,
}

impl WebhookDispatcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Host portion of a webhook URL, for logs. The path carries the token.
fn redact(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "<invalid url>".to_string())
}

#[async_trait]
impl WebhookDispatch for WebhookDispatcher {
    async fn dispatch(&self, platform: Platform, url: &str, payload: &Value) -> DispatchOutcome {
        let label = platform.label();
        let host = redact(url);
        let start = Instant::now();

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(
                    platform = %platform,
                    host = %host,
                    status = resp.status().as_u16(),
                    elapsed_ms,
                    "Webhook delivered"
                );
                DispatchOutcome::Success
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                tracing::warn!(
                    platform = %platform,
                    host = %host,
                    status,
                    elapsed_ms,
                    "Webhook rejected by upstream"
                );
                DispatchOutcome::failure(format!("{label} API Error: {body}"), Some(status))
            }
            Err(e) => {
                tracing::error!(
                    platform = %platform,
                    host = %host,
                    elapsed_ms,
                    error = %e,
                    "Webhook request failed"
                );
                DispatchOutcome::failure(format!("Failed to connect to {label} API"), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn dispatcher() -> WebhookDispatcher {
        WebhookDispatcher::new(Client::new())
    }

    #[tokio::test]
    async fn test_success_posts_payload() {
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let router = Router::new().route(
            "/hook",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(body);
                    StatusCode::OK
                }
            }),
        );
        let base = spawn_upstream(router).await;

        let payload = Platform::Slack.spec().build_payload("hello");
        let outcome = dispatcher()
            .dispatch(Platform::Slack, &format!("{base}/hook"), &payload)
            .await;

        assert_eq!(outcome, DispatchOutcome::Success);
        assert_eq!(*received.lock().unwrap(), Some(json!({ "text": "hello" })));
    }

    #[tokio::test]
    async fn test_no_content_is_success() {
        let router = Router::new().route("/hook", post(|| async { StatusCode::NO_CONTENT }));
        let base = spawn_upstream(router).await;

        let outcome = dispatcher()
            .dispatch(Platform::Discord, &format!("{base}/hook"), &json!({ "content": "x" }))
            .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_body_and_status() {
        let router = Router::new().route(
            "/hook",
            post(|| async { (StatusCode::NOT_FOUND, "no_webhook") }),
        );
        let base = spawn_upstream(router).await;

        let outcome = dispatcher()
            .dispatch(Platform::Slack, &format!("{base}/hook"), &json!({ "text": "x" }))
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::failure("Slack API Error: no_webhook", Some(404))
        );
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let outcome = dispatcher()
            .dispatch(Platform::Discord, "http://127.0.0.1:1/hook", &json!({ "content": "x" }))
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::failure("Failed to connect to Discord API", None)
        );
    }

    #[test]
    fn test_redact_keeps_host_only() {
        assert_eq!(
            redact("https://discord.com/api/webhooks/1/secret"),
            "discord.com"
        );
        assert_eq!(redact("not a url"), "<invalid url>");
    }
}
