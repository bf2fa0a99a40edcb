//! Delayed dispatch state machine.
//!
//! One submission at a time moves through
//! `Idle → Validating → Scheduled → Dispatching → Succeeded | Failed → Idle`.
//! The wait that decides when to dispatch is a single sleep of the full
//! duration; the per-second countdown is a separate cosmetic task. Both share
//! one cancellation token derived from the scheduler's shutdown token.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::webhook::{Platform, WebhookDispatch};
use crate::models::{DispatchOutcome, NotificationKind, RawSubmission, Submission};
use crate::services::delay::{countdown_seconds, to_duration, to_milliseconds};
use crate::services::notification_store::NotificationSink;
use crate::services::validation;

pub const SUCCESS_TITLE: &str = "Message Sent";
pub const ERROR_TITLE: &str = "Error Sending Message";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Validating,
    Scheduled {
        #[serde(rename = "submissionId")]
        submission_id: Uuid,
        platform: Platform,
        /// Cosmetic countdown, floor of the remaining wait in seconds
        #[serde(rename = "remainingSeconds")]
        remaining_seconds: u64,
        #[serde(rename = "totalMs")]
        total_ms: u64,
    },
    Dispatching {
        #[serde(rename = "submissionId")]
        submission_id: Uuid,
        platform: Platform,
    },
    Succeeded {
        #[serde(rename = "submissionId")]
        submission_id: Uuid,
        platform: Platform,
    },
    Failed {
        #[serde(rename = "submissionId")]
        submission_id: Uuid,
        platform: Platform,
        reason: String,
    },
}

impl SchedulerState {
    pub fn name(&self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Validating => "validating",
            SchedulerState::Scheduled { .. } => "scheduled",
            SchedulerState::Dispatching { .. } => "dispatching",
            SchedulerState::Succeeded { .. } => "succeeded",
            SchedulerState::Failed { .. } => "failed",
        }
    }
}

/// Handle to an accepted submission
#[derive(Debug)]
pub struct DispatchTicket {
    pub submission_id: Uuid,
    pub platform: Platform,
    pub total_ms: u64,
    pub remaining_seconds: u64,
    /// Resolves to `None` when the submission was cancelled before firing
    pub handle: JoinHandle<Option<DispatchOutcome>>,
}

struct LiveSubmission {
    id: Uuid,
    cancel: CancellationToken,
    dispatching: bool,
}

struct Inner {
    state: watch::Sender<SchedulerState>,
    live: Mutex<Option<LiveSubmission>>,
    dispatcher: Arc<dyn WebhookDispatch>,
    sink: Arc<dyn NotificationSink>,
    shutdown: CancellationToken,
}

impl Inner {
    fn live(&self) -> MutexGuard<'_, Option<LiveSubmission>> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SchedulerState) {
        tracing::debug!(state = state.name(), "Scheduler transition");
        self.state.send_replace(state);
    }
}

#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    pub fn new(dispatcher: Arc<dyn WebhookDispatch>, sink: Arc<dyn NotificationSink>) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            inner: Arc::new(Inner {
                state,
                live: Mutex::new(None),
                dispatcher,
                sink,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.inner.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.live().is_some()
    }

    /// Validates `raw` and, if it passes, starts the countdown.
    ///
    /// # Errors
    /// - `Conflict` when another submission is live or the scheduler is shut down
    /// - `ValidationErrors` when any field fails; the machine returns to `Idle`
    pub fn submit(&self, raw: &RawSubmission) -> AppResult<DispatchTicket> {
        let mut live = self.inner.live();
        if live.is_some() {
            return Err(AppError::conflict("A message is already scheduled"));
        }
        if self.inner.shutdown.is_cancelled() {
            return Err(AppError::conflict("Scheduler is shutting down"));
        }

        self.inner.set_state(SchedulerState::Validating);
        let submission = match validation::validate(raw) {
            Ok(submission) => submission,
            Err(errors) => {
                self.inner.set_state(SchedulerState::Idle);
                return Err(errors.into());
            }
        };

        let total_ms = to_milliseconds(submission.delay, submission.delay_unit);
        let remaining_seconds = countdown_seconds(total_ms);
        let cancel = self.inner.shutdown.child_token();

        *live = Some(LiveSubmission {
            id: submission.id,
            cancel: cancel.clone(),
            dispatching: false,
        });
        self.inner.set_state(SchedulerState::Scheduled {
            submission_id: submission.id,
            platform: submission.platform,
            remaining_seconds,
            total_ms,
        });
        drop(live);

        tracing::info!(
            submission_id = %submission.id,
            platform = %submission.platform,
            delay = submission.delay,
            unit = %submission.delay_unit,
            total_ms,
            "Message scheduled"
        );

        let submission_id = submission.id;
        let platform = submission.platform;
        let handle = tokio::spawn(self.clone().run(submission, total_ms, cancel));

        Ok(DispatchTicket {
            submission_id,
            platform,
            total_ms,
            remaining_seconds,
            handle,
        })
    }

    /// Cancels the live submission if it has not started dispatching.
    ///
    /// # Errors
    /// - `NotFound` when nothing is scheduled
    /// - `Conflict` when the webhook call is already in flight
    pub fn cancel(&self) -> AppResult<Uuid> {
        let mut live = self.inner.live();
        let Some(current) = live.as_ref() else {
            return Err(AppError::not_found("submission", "state", "scheduled"));
        };
        if current.dispatching {
            return Err(AppError::conflict("Message is already being sent"));
        }

        let id = current.id;
        current.cancel.cancel();
        *live = None;
        self.inner.set_state(SchedulerState::Idle);
        drop(live);

        tracing::info!(submission_id = %id, "Scheduled message cancelled");
        Ok(id)
    }

    /// Cancels any pending wait and refuses new submissions.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    async fn run(
        self,
        submission: Submission,
        total_ms: u64,
        cancel: CancellationToken,
    ) -> Option<DispatchOutcome> {
        let id = submission.id;
        let platform = submission.platform;

        let ticker = cancel.child_token();
        tokio::spawn(self.clone().tick(id, total_ms, ticker.clone()));
        let _stop_ticker = ticker.clone().drop_guard();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.release(id, SchedulerState::Idle);
                return None;
            }
            _ = tokio::time::sleep(to_duration(submission.delay, submission.delay_unit)) => {}
        }

        {
            let mut live = self.inner.live();
            let Some(current) = live
                .as_mut()
                .filter(|current| current.id == id && !cancel.is_cancelled())
            else {
                drop(live);
                self.release(id, SchedulerState::Idle);
                return None;
            };
            current.dispatching = true;
            ticker.cancel();
            self.inner.set_state(SchedulerState::Dispatching {
                submission_id: id,
                platform,
            });
        }

        let payload = platform.spec().build_payload(&submission.message);
        let outcome = self
            .inner
            .dispatcher
            .dispatch(platform, &submission.webhook_url, &payload)
            .await;

        let finished = match &outcome {
            DispatchOutcome::Success => {
                self.inner.sink.notify(
                    NotificationKind::Success,
                    SUCCESS_TITLE,
                    &format!("Your message was successfully sent to {}", platform.label()),
                );
                SchedulerState::Succeeded {
                    submission_id: id,
                    platform,
                }
            }
            DispatchOutcome::Failure { reason, .. } => {
                self.inner
                    .sink
                    .notify(NotificationKind::Error, ERROR_TITLE, reason);
                SchedulerState::Failed {
                    submission_id: id,
                    platform,
                    reason: reason.clone(),
                }
            }
        };

        tracing::info!(
            submission_id = %id,
            platform = %platform,
            success = outcome.is_success(),
            "Scheduled message finished"
        );
        self.release(id, finished);
        Some(outcome)
    }

    /// Clears the live slot if it still belongs to `id`, passing through
    /// `last` on the way back to `Idle`.
    fn release(&self, id: Uuid, last: SchedulerState) {
        let mut live = self.inner.live();
        if live.as_ref().is_some_and(|current| current.id == id) {
            *live = None;
            if last != SchedulerState::Idle {
                self.inner.set_state(last);
            }
            self.inner.set_state(SchedulerState::Idle);
        }
    }

    async fn tick(self, id: Uuid, total_ms: u64, stop: CancellationToken) {
        let period = Duration::from_secs(1);
        let mut interval = interval_at(Instant::now() + period, period);
        let mut remaining = countdown_seconds(total_ms);

        while remaining > 0 {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                _ = interval.tick() => {}
            }

            remaining -= 1;
            self.inner.state.send_if_modified(|state| match state {
                SchedulerState::Scheduled {
                    submission_id,
                    remaining_seconds,
                    ..
                } if *submission_id == id => {
                    *remaining_seconds = remaining;
                    true
                }
                _ => false,
            });
            tracing::trace!(submission_id = %id, remaining, "Countdown tick");
        }
    }
}
