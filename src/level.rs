//! The eight-level severity scale attached to every [`LogEntry`].
//!
//! Codes follow the conventional syslog ordering: `0` is the most urgent
//! ([`Severity::Emergency`]) and `7` the least ([`Severity::Debug`]).
//!
//! [`LogEntry`]: crate::log_record::LogEntry

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    #[default]
    Informational,
    Debug,
}

/// Returned when a string does not name a known severity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity: {0}")]
pub struct ParseSeverityError(pub String);

impl Severity {
    /// Every severity in code order.
    pub const ALL: [Severity; 8] = [
        Self::Emergency,
        Self::Alert,
        Self::Critical,
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Informational,
        Self::Debug,
    ];

    /// Numeric code in the range `0..=7`.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a severity by numeric code; `None` outside `0..=7`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Uppercase name used when rendering entries.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCY",
            Self::Alert => "ALERT",
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Notice => "NOTICE",
            Self::Informational => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Whether this severity is at least as urgent as `threshold`.
    pub fn is_at_least(self, threshold: Severity) -> bool {
        self <= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emergency" | "emerg" => Ok(Self::Emergency),
            "alert" => Ok(Self::Alert),
            "critical" | "crit" => Ok(Self::Critical),
            "error" | "err" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "notice" => Ok(Self::Notice),
            "informational" | "info" => Ok(Self::Informational),
            "debug" => Ok(Self::Debug),
            _ => Err(ParseSeverityError(s.to_owned())),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warning,
            log::Level::Info => Self::Informational,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}

/// Most verbose `log` filter that can still produce records at `severity`.
#[cfg(feature = "log-compat")]
pub(crate) fn to_level_filter(severity: Severity) -> log::LevelFilter {
    match severity {
        Severity::Emergency | Severity::Alert | Severity::Critical | Severity::Error => {
            log::LevelFilter::Error
        }
        Severity::Warning | Severity::Notice => log::LevelFilter::Warn,
        Severity::Informational => log::LevelFilter::Info,
        Severity::Debug => log::LevelFilter::Trace,
    }
}
