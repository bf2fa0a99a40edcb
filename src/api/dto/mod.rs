//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `message` - immediate send
//! - `dispatch` - scheduled submissions and validation
//! - `platform` - registry listing
//! - `health` - health probes
//! - `error` - common error response

mod dispatch;
mod error;
mod health;
mod message;
mod platform;

pub use dispatch::{CancelDispatchResponse, DispatchAcceptedResponse, ValidateResponse};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use message::{SendMessageRequest, SendMessageResponse};
pub use platform::{DelayUnitResponse, PlatformResponse, PlatformsResponse};
