//! Send command handler
//!
//! Hosts a single submission inside the CLI process: the scheduler runs the
//! countdown, this handler reports it and waits for the outcome.

use std::future::Future;

use anyhow::bail;
use tokio::sync::watch;
use uuid::Uuid;

use crate::cli::parser::SendArgs;
use crate::config::settings::Settings;
use crate::models::{DispatchOutcome, RawSubmission};
use crate::server::shutdown_signal;
use crate::services::{SchedulerState, Services};

/// Handler for the send command
pub struct SendCommandHandler {
    services: Services,
}

impl SendCommandHandler {
    /// Builds the engine with a real webhook client.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::with_services(Services::new(settings)?))
    }

    pub fn with_services(services: Services) -> Self {
        Self { services }
    }

    /// Schedules the message and waits for it, cancelling on Ctrl+C.
    pub async fn execute(&self, args: &SendArgs) -> anyhow::Result<()> {
        self.execute_until(args, shutdown_signal()).await
    }

    /// Same as [`execute`](Self::execute) with a caller-supplied interrupt.
    ///
    /// When `interrupt` fires while the countdown is running, the submission
    /// is cancelled and an error is returned. Once the webhook call has
    /// started it is allowed to finish.
    ///
    /// # Errors
    /// - Field errors from validation
    /// - The webhook failure reason, or cancellation
    pub async fn execute_until(
        &self,
        args: &SendArgs,
        interrupt: impl Future<Output = ()>,
    ) -> anyhow::Result<()> {
        let scheduler = &self.services.scheduler;
        let raw = RawSubmission::new(
            args.platform.as_str(),
            args.webhook_url.as_str(),
            args.message.as_str(),
            args.delay,
            args.unit,
        );

        let mut ticket = scheduler.submit(&raw)?;
        println!(
            "Scheduled {} message, sending in {} {}",
            ticket.platform.label(),
            args.delay,
            args.unit
        );

        let countdown = tokio::spawn(log_countdown(scheduler.subscribe(), ticket.submission_id));
        tokio::pin!(interrupt);

        let outcome = tokio::select! {
            joined = &mut ticket.handle => joined?,
            _ = &mut interrupt => match scheduler.cancel() {
                Ok(_) => None,
                Err(_) => {
                    tracing::warn!(
                        submission_id = %ticket.submission_id,
                        "Message is already being sent, waiting for the result"
                    );
                    (&mut ticket.handle).await?
                }
            },
        };
        countdown.abort();

        match outcome {
            Some(DispatchOutcome::Success) => {
                println!(
                    "✓ Your message was successfully sent to {}",
                    ticket.platform.label()
                );
                Ok(())
            }
            Some(failure) => {
                failure.into_result()?;
                Ok(())
            }
            None => bail!("Message was cancelled before it was sent"),
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}

/// Logs the remaining seconds of submission `id` on every tick.
async fn log_countdown(mut states: watch::Receiver<SchedulerState>, id: Uuid) {
    loop {
        let done = match &*states.borrow_and_update() {
            SchedulerState::Scheduled {
                submission_id,
                remaining_seconds,
                ..
            } if *submission_id == id => {
                tracing::info!(
                    submission_id = %id,
                    remaining_seconds = *remaining_seconds,
                    "Sending in {}s",
                    remaining_seconds
                );
                false
            }
            SchedulerState::Dispatching { submission_id, .. } if *submission_id == id => {
                tracing::info!(submission_id = %id, "Sending now");
                true
            }
            _ => false,
        };

        if done || states.changed().await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::webhook::{Platform, WebhookDispatch};
    use crate::models::DelayUnit;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const DISCORD_URL: &str = "https://discord.com/api/webhooks/123456/abc-DEF_ghi";

    struct StubDispatcher {
        outcome: DispatchOutcome,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WebhookDispatch for StubDispatcher {
        async fn dispatch(&self, _platform: Platform, _url: &str, _payload: &Value) -> DispatchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn handler(outcome: DispatchOutcome) -> (SendCommandHandler, Arc<StubDispatcher>) {
        let dispatcher = Arc::new(StubDispatcher {
            outcome,
            calls: AtomicUsize::new(0),
        });
        let services = Services::with_dispatcher(&Settings::default(), dispatcher.clone());
        (SendCommandHandler::with_services(services), dispatcher)
    }

    fn args(delay: u32) -> SendArgs {
        SendArgs {
            platform: "discord".to_string(),
            webhook_url: DISCORD_URL.to_string(),
            message: "Deploy   finished".to_string(),
            delay,
            unit: DelayUnit::Seconds,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_succeeds_after_delay() {
        let (handler, dispatcher) = handler(DispatchOutcome::Success);

        handler
            .execute_until(&args(3), std::future::pending())
            .await
            .unwrap();

        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
        let notifications = handler.services().notifications.list();
        assert_eq!(notifications[0].title, "Message Sent");
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_reports_upstream_failure() {
        let (handler, _) = handler(DispatchOutcome::failure(
            "Discord API Error: Unknown Webhook",
            Some(404),
        ));

        let err = handler
            .execute_until(&args(1), std::future::pending())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Discord API Error: Unknown Webhook");
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_cancels_countdown() {
        let (handler, dispatcher) = handler(DispatchOutcome::Success);

        let err = handler
            .execute_until(&args(10), tokio::time::sleep(Duration::from_secs(2)))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("cancelled"));
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(handler.services().scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected() {
        let (handler, dispatcher) = handler(DispatchOutcome::Success);
        let mut bad = args(0);
        bad.webhook_url = "https://example.com/hook".to_string();

        let err = handler
            .execute_until(&bad, std::future::pending())
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Delay must be at least 1"), "{message}");
        assert!(message.contains("Invalid Discord Webhook URL format"), "{message}");
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    }
}
