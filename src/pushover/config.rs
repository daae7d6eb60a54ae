//! Connection settings for [`PushoverClient`](super::PushoverClient).

use std::fmt;
use std::time::Duration;

/// Base URL of the public Pushover API.
pub const DEFAULT_API_BASE: &str = "https://api.pushover.net/1";
/// Default connection timeout applied when establishing HTTP connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default overall request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration object describing how to reach the Pushover API.
#[derive(Clone, PartialEq, Eq)]
pub struct PushoverConfig {
    /// Application API token.
    pub token: String,
    /// API base URL without a trailing slash.
    pub api_base: String,
    /// Timeout for establishing connections.
    pub connect_timeout: Duration,
    /// Timeout for a complete request.
    pub timeout: Duration,
}

impl PushoverConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_owned(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(super) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }
}

impl fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}
