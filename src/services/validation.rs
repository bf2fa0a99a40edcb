//! Form validation for delayed submissions.
//!
//! Checks are pure and cheap so callers can re-run them on every debounced
//! keystroke. Every rule reports at most one error per field, keyed by the
//! field's wire name.

use std::borrow::Cow;

use jiff::Timestamp;
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};
use crate::external::webhook::Platform;
use crate::models::{DelayUnit, RawSubmission, Submission};

pub const MIN_DELAY: u32 = 1;
pub const MAX_DELAY: u32 = 3600;

pub const FIELD_DELAY: &str = "delay";
pub const FIELD_DELAY_UNIT: &str = "delayUnit";
pub const FIELD_PLATFORM: &str = "platform";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_WEBHOOK_URL: &str = "webhookUrl";

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Whitespace for message normalization: Unicode whitespace plus the BOM.
fn is_message_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Message length as browsers count it, in UTF-16 code units.
pub fn message_length(message: &str) -> usize {
    message.encode_utf16().count()
}

/// Trims and collapses every whitespace run to a single space.
pub fn normalize_message(raw: &str) -> String {
    raw.split(is_message_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accepts JSON integers, integral floats and numeric strings.
pub fn check_delay(value: Option<&Value>) -> Result<u32, ValidationError> {
    let number = match value {
        None | Some(Value::Null) => return Err(field_error("required", "Delay is required")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(field_error("required", "Delay is required"));
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    let Some(number) = number.filter(|n| n.is_finite() && n.fract() == 0.0) else {
        return Err(field_error("integer", "Delay must be a whole number"));
    };

    if number < f64::from(MIN_DELAY) {
        return Err(field_error("range", format!("Delay must be at least {MIN_DELAY}")));
    }
    if number > f64::from(MAX_DELAY) {
        return Err(field_error("range", format!("Delay cannot exceed {MAX_DELAY}")));
    }

    Ok(number as u32)
}

pub fn check_delay_unit(value: Option<&Value>) -> Result<DelayUnit, ValidationError> {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<DelayUnit>().ok())
        .ok_or_else(|| {
            field_error(
                "enum",
                "Delay unit must be one of: seconds, minutes, hours",
            )
        })
}

pub fn check_platform(value: Option<&Value>) -> Result<Platform, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(field_error("required", "Platform is required")),
        Some(Value::String(s)) => s
            .parse::<Platform>()
            .map_err(|err| field_error("unsupported", err.to_string())),
        Some(other) => Err(field_error(
            "unsupported",
            format!("Unsupported platform: {other}"),
        )),
    }
}

/// Normalizes the message and enforces the platform limit.
///
/// The limit is only checked when the platform is known.
pub fn check_message(
    value: Option<&Value>,
    platform: Option<Platform>,
) -> Result<String, ValidationError> {
    let raw = match value {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(field_error("type", "Message must be text")),
    };

    let message = normalize_message(raw);
    if message.is_empty() {
        return Err(field_error(
            "blank",
            "Message cannot be empty or contain only spaces",
        ));
    }

    if let Some(spec) = platform.map(|p| p.spec()) {
        let max = spec.message_limit;
        if message_length(&message) > max {
            let mut error = field_error(
                "too_long",
                format!("{} messages cannot exceed {} characters", spec.label, max),
            );
            error.add_param(Cow::Borrowed("max"), &max);
            return Err(error);
        }
    }

    Ok(message)
}

/// The shape check is only applied when the platform is known.
pub fn check_webhook_url(
    value: Option<&Value>,
    platform: Option<Platform>,
) -> Result<String, ValidationError> {
    let url = match value {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(field_error("type", "Webhook URL must be text")),
    };

    if url.is_empty() {
        return Err(field_error("required", "Webhook URL cannot be empty"));
    }

    if let Some(spec) = platform.map(|p| p.spec())
        && !spec.matches_url(url)
    {
        return Err(field_error(
            "format",
            format!("Invalid {} Webhook URL format", spec.label),
        ));
    }

    Ok(url.to_string())
}

/// Runs every rule over `raw`, collecting all field errors.
pub fn validate(raw: &RawSubmission) -> Result<Submission, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let delay = check_delay(raw.delay.as_ref())
        .map_err(|e| errors.add(FIELD_DELAY, e))
        .ok();
    let delay_unit = check_delay_unit(raw.delay_unit.as_ref())
        .map_err(|e| errors.add(FIELD_DELAY_UNIT, e))
        .ok();
    let platform = check_platform(raw.platform.as_ref())
        .map_err(|e| errors.add(FIELD_PLATFORM, e))
        .ok();
    let message = check_message(raw.message.as_ref(), platform)
        .map_err(|e| errors.add(FIELD_MESSAGE, e))
        .ok();
    let webhook_url = check_webhook_url(raw.webhook_url.as_ref(), platform)
        .map_err(|e| errors.add(FIELD_WEBHOOK_URL, e))
        .ok();

    let (Some(delay), Some(delay_unit), Some(platform), Some(message), Some(webhook_url)) =
        (delay, delay_unit, platform, message, webhook_url)
    else {
        return Err(errors);
    };

    Ok(Submission {
        id: Uuid::new_v4(),
        platform,
        webhook_url,
        message,
        delay,
        delay_unit,
        created_at: Timestamp::now(),
    })
}

impl Validate for RawSubmission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate(self).map(|_| ())
    }
}

/// Checks for the immediate send endpoint, in order, stopping at the first
/// failure: platform, webhook URL, empty message, message length.
///
/// Returns the trimmed message; inner whitespace is left untouched.
pub fn check_send_request(platform: &str, webhook_url: &str, message: &str) -> AppResult<(Platform, String)> {
    let platform: Platform = platform.parse()?;
    let spec = platform.spec();

    if webhook_url.is_empty() || !spec.matches_url(webhook_url) {
        return Err(AppError::validation(
            FIELD_WEBHOOK_URL,
            format!("Invalid {} webhook URL", spec.label),
        ));
    }

    let message = message.trim_matches(is_message_space);
    if message.is_empty() {
        return Err(AppError::validation(FIELD_MESSAGE, "Message cannot be empty"));
    }

    if message_length(message) > spec.message_limit {
        return Err(AppError::validation(
            FIELD_MESSAGE,
            format!(
                "{} messages cannot exceed {} characters",
                spec.label, spec.message_limit
            ),
        ));
    }

    Ok((platform, message.to_string()))
}
