use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::webhook::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Seconds,
    Minutes,
    Hours,
}

impl DelayUnit {
    pub const ALL: [DelayUnit; 3] = [DelayUnit::Seconds, DelayUnit::Minutes, DelayUnit::Hours];

    pub fn as_str(&self) -> &'static str {
        match self {
            DelayUnit::Seconds => "seconds",
            DelayUnit::Minutes => "minutes",
            DelayUnit::Hours => "hours",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DelayUnit::Seconds => "Seconds",
            DelayUnit::Minutes => "Minutes",
            DelayUnit::Hours => "Hours",
        }
    }

    pub fn millis_per_unit(&self) -> u64 {
        match self {
            DelayUnit::Seconds => 1_000,
            DelayUnit::Minutes => 60_000,
            DelayUnit::Hours => 3_600_000,
        }
    }
}

impl fmt::Display for DelayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DelayUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DelayUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| {
                AppError::validation(
                    "delayUnit",
                    "Delay unit must be one of: seconds, minutes, hours",
                )
            })
    }
}

/// Form values exactly as received.
///
/// Every field is optional and untyped so that a missing or mistyped value
/// surfaces as a field error from the validation engine instead of a body
/// parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSubmission {
    #[schema(value_type = Option<String>, example = "slack")]
    pub platform: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub webhook_url: Option<Value>,
    #[schema(value_type = Option<String>, example = "Stand-up in five minutes")]
    pub message: Option<Value>,
    #[schema(value_type = Option<u32>, example = 5)]
    pub delay: Option<Value>,
    #[schema(value_type = Option<String>, example = "minutes")]
    pub delay_unit: Option<Value>,
}

impl RawSubmission {
    pub fn new(
        platform: impl Into<String>,
        webhook_url: impl Into<String>,
        message: impl Into<String>,
        delay: u32,
        delay_unit: DelayUnit,
    ) -> Self {
        Self {
            platform: Some(Value::String(platform.into())),
            webhook_url: Some(Value::String(webhook_url.into())),
            message: Some(Value::String(message.into())),
            delay: Some(Value::from(delay)),
            delay_unit: Some(Value::String(delay_unit.as_str().to_string())),
        }
    }
}

/// A validated request to send one message after a delay.
///
/// Never mutated after creation; the scheduler tracks time alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub platform: Platform,
    /// Webhook URLs embed credentials and are never serialized
    #[serde(skip)]
    pub webhook_url: String,
    /// Normalized text: trimmed, whitespace runs collapsed
    pub message: String,
    pub delay: u32,
    pub delay_unit: DelayUnit,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
}

/// Result of a single webhook call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchOutcome {
    Success,
    Failure {
        reason: String,
        #[serde(rename = "httpStatus", skip_serializing_if = "Option::is_none")]
        http_status: Option<u16>,
    },
}

impl DispatchOutcome {
    pub fn failure(reason: impl Into<String>, http_status: Option<u16>) -> Self {
        DispatchOutcome::Failure {
            reason: reason.into(),
            http_status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success)
    }

    /// Upstream failures keep their status; failures without one are
    /// connectivity errors.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            DispatchOutcome::Success => Ok(()),
            DispatchOutcome::Failure {
                reason,
                http_status: Some(status),
            } => Err(AppError::Upstream {
                message: reason,
                status,
            }),
            DispatchOutcome::Failure {
                reason,
                http_status: None,
            } => Err(AppError::Network { message: reason }),
        }
    }
}
