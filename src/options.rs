//! Presentation options applied to every outbound notification.

use serde::{Deserialize, Serialize};

/// Optional message parameters.
///
/// Absent fields leave the provider's defaults in effect. `retry` and
/// `expire` are only applied when the entry maps to the emergency tier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeliveryOptions {
    /// Seconds between re-alerts of an unacknowledged emergency message.
    pub retry: Option<u32>,
    /// Seconds after which emergency re-alerts stop.
    pub expire: Option<u32>,
    /// Message title; the provider falls back to the application name.
    pub title: Option<String>,
    /// Supplementary URL shown with the message.
    pub url: Option<String>,
    /// Title for the supplementary URL.
    pub url_title: Option<String>,
    /// Unix timestamp displayed as the message time.
    pub timestamp: Option<i64>,
    /// Name of one of the provider's alert sounds.
    pub sound: Option<String>,
}

impl DeliveryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retry(mut self, seconds: u32) -> Self {
        self.retry = Some(seconds);
        self
    }

    pub fn with_expire(mut self, seconds: u32) -> Self {
        self.expire = Some(seconds);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_url_title(mut self, url_title: impl Into<String>) -> Self {
        self.url_title = Some(url_title.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }
}
