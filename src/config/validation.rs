//! Configuration validation logic
//!
//! Each section checks its own ranges; [`Settings::validate`] returns the
//! first failure.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DispatchConfig, FileSettings, LoggerSettings, NotificationsConfig, ServerConfig, Settings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - CORS origins must be absolute http(s) origins or `*`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if let Some(origin) = self.cors_allowed_origins.iter().find(|origin| {
            origin.as_str() != "*"
                && !(origin.starts_with("http://") || origin.starts_with("https://"))
        }) {
            return Err(ConfigError::validation(
                "server.cors_allowed_origins",
                format!("Invalid origin '{}'. Expected '*' or an http(s) origin.", origin),
            ));
        }

        Ok(())
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "dispatch.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::validation(
                "dispatch.user_agent",
                "User agent cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl NotificationsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::validation(
                "notifications.limit",
                "At least one notification must be kept visible.",
            ));
        }

        if self.channel_capacity == 0 {
            return Err(ConfigError::validation(
                "notifications.channel_capacity",
                "Channel capacity must be greater than 0.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.dispatch.validate()?;
        self.notifications.validate()?;
        Ok(())
    }
}
