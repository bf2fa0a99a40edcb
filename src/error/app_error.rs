use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::ConfigError;

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationFieldError {
    /// Wire name of the field, e.g. `webhookUrl`
    pub field: String,
    pub message: String,
    /// Extra values attached to the failing rule, such as `max`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub params: BTreeMap<String, serde_json::Value>,
}

/// Application-wide error type.
///
/// Dispatch failures from the webhook client are carried as data by
/// `DispatchOutcome`; they only become `Upstream` or `Network` errors when a
/// handler needs to report them over HTTP.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// A single local check failed
    #[error("{reason}")]
    Validation { field: String, reason: String },

    /// Several form fields failed; at most one entry per field
    #[error("Validation failed: {}", join_messages(.errors))]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    #[error("Unsupported platform: {platform}")]
    UnsupportedPlatform { platform: String },

    /// The webhook answered with a non-2xx status
    #[error("{message}")]
    Upstream { message: String, status: u16 },

    /// The webhook could not be reached
    #[error("{message}")]
    Network { message: String },

    /// Another submission already owns the engine, or the current one can no
    /// longer be changed
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

fn join_messages(errors: &[ValidationFieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict {
            message: message.into(),
        }
    }

    pub fn not_found(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        AppError::NotFound {
            entity: entity.into(),
            field: field.into(),
            value: value.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Flattens validator output into one entry per field, sorted by field name.
pub fn field_errors(errors: &validator::ValidationErrors) -> Vec<ValidationFieldError> {
    let mut fields: Vec<ValidationFieldError> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| ValidationFieldError {
                field: field.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
                params: err
                    .params
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.clone()))
                    .collect(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationErrors {
            errors: field_errors(&errors),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
