//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::Settings;
use crate::external::webhook::WebhookDispatch;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since services and settings sit behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Scheduler, notification store and webhook dispatcher
    pub services: Services,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Creates a new AppState with a real HTTP client for webhook calls.
    ///
    /// # Example
    /// ```ignore
    /// let settings = ConfigLoader::new()?.load()?;
    /// let state = AppState::new(settings)?;
    /// ```
    pub fn new(settings: Settings) -> reqwest::Result<Self> {
        let services = Services::new(&settings)?;
        Ok(Self {
            services,
            settings: Arc::new(settings),
        })
    }

    /// Creates an AppState that sends webhooks through `dispatcher`.
    pub fn with_dispatcher(settings: Settings, dispatcher: Arc<dyn WebhookDispatch>) -> Self {
        Self {
            services: Services::with_dispatcher(&settings, dispatcher),
            settings: Arc::new(settings),
        }
    }
}
