//! Registry of supported webhook destinations

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Slack,
    Discord,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Slack, Platform::Discord];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Slack => "slack",
            Platform::Discord => "discord",
        }
    }

    pub fn spec(&self) -> &'static PlatformSpec {
        lookup(*self)
    }

    /// Display label, e.g. `Slack`
    pub fn label(&self) -> &'static str {
        self.spec().label
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| AppError::UnsupportedPlatform {
                platform: s.to_string(),
            })
    }
}

/// Immutable rules for one destination
pub struct PlatformSpec {
    pub platform: Platform,
    pub label: &'static str,
    /// Maximum message length in UTF-16 code units, after whitespace normalization
    pub message_limit: usize,
    url_pattern: Regex,
    build_payload: fn(&str) -> Value,
}

impl PlatformSpec {
    fn new(
        platform: Platform,
        label: &'static str,
        message_limit: usize,
        url_pattern: &str,
        build_payload: fn(&str) -> Value,
    ) -> Self {
        Self {
            platform,
            label,
            message_limit,
            url_pattern: Regex::new(url_pattern).expect("webhook URL pattern must compile"),
            build_payload,
        }
    }

    /// Whole-string match against this platform's webhook URL shape
    pub fn matches_url(&self, url: &str) -> bool {
        self.url_pattern.is_match(url)
    }

    pub fn url_pattern(&self) -> &str {
        self.url_pattern.as_str()
    }

    /// JSON body the platform expects for a plain text message
    pub fn build_payload(&self, text: &str) -> Value {
        (self.build_payload)(text)
    }
}

impl fmt::Debug for PlatformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformSpec")
            .field("platform", &self.platform)
            .field("label", &self.label)
            .field("message_limit", &self.message_limit)
            .field("url_pattern", &self.url_pattern.as_str())
            .finish()
    }
}

static SLACK: LazyLock<PlatformSpec> = LazyLock::new(|| {
    PlatformSpec::new(
        Platform::Slack,
        "Slack",
        4000,
        r"^https://hooks\.slack\.com/services/[A-Z0-9]{11}/[A-Z0-9]{11}/[a-zA-Z0-9]{24}$",
        |text| json!({ "text": text }),
    )
});

static DISCORD: LazyLock<PlatformSpec> = LazyLock::new(|| {
    PlatformSpec::new(
        Platform::Discord,
        "Discord",
        2000,
        r"^https://discord\.com/api/webhooks/[0-9]+/[A-Za-z0-9_-]+$",
        |text| json!({ "content": text }),
    )
});

pub fn lookup(platform: Platform) -> &'static PlatformSpec {
    match platform {
        Platform::Slack => &*SLACK,
        Platform::Discord => &*DISCORD,
    }
}
