//! Webhook destinations and delivery

mod dispatcher;
mod platform;

pub use dispatcher::{WebhookDispatch, WebhookDispatcher};
pub use platform::{Platform, PlatformSpec, lookup};
