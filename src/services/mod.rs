//! Service layer for the dispatch engine.
//!
//! Services hold the engine's runtime state and coordinate between the
//! webhook client and the handlers.

pub mod delay;
pub mod notification_store;
pub mod scheduler;
pub mod validation;

pub use notification_store::{NotificationSink, NotificationStore};
pub use scheduler::{DispatchTicket, Scheduler, SchedulerState};

use std::sync::Arc;

use crate::config::Settings;
use crate::external::client::build_http_client;
use crate::external::webhook::{WebhookDispatch, WebhookDispatcher};

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since every service is `Arc`-backed.
#[derive(Clone)]
pub struct Services {
    pub scheduler: Scheduler,
    pub notifications: NotificationStore,
    pub dispatcher: Arc<dyn WebhookDispatch>,
}

impl Services {
    /// Creates the services backed by a real HTTP client.
    pub fn new(settings: &Settings) -> reqwest::Result<Self> {
        let client = build_http_client(&settings.dispatch)?;
        Ok(Self::with_dispatcher(
            settings,
            Arc::new(WebhookDispatcher::new(client)),
        ))
    }

    /// Creates the services around a caller-supplied dispatcher.
    pub fn with_dispatcher(settings: &Settings, dispatcher: Arc<dyn WebhookDispatch>) -> Self {
        let notifications = NotificationStore::new(&settings.notifications);
        let scheduler = Scheduler::new(dispatcher.clone(), Arc::new(notifications.clone()));
        Self {
            scheduler,
            notifications,
            dispatcher,
        }
    }
}
