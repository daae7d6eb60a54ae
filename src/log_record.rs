//! Log entry representation consumed by the notification writer.
//!
//! A [`LogEntry`] is produced by whichever facade sits upstream (the `log`
//! bridge, the `tracing` layer, or a direct caller) and is read-only from the
//! writer's point of view.

use crate::level::Severity;
use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

/// Additional context associated with a log entry.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordMetadata {
    /// Rust module path where the log call originated.
    pub module_path: String,
    /// Source file name for the log call.
    pub filename: String,
    /// Line number in the source file.
    pub line_number: u32,
    /// Time the entry was created.
    pub timestamp: SystemTime,
    /// Structured key-value pairs attached to the entry.
    pub key_values: BTreeMap<String, String>,
}

impl Default for RecordMetadata {
    fn default() -> Self {
        Self {
            module_path: String::new(),
            filename: String::new(),
            line_number: 0,
            timestamp: SystemTime::now(),
            key_values: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// Name of the logger (or target) that produced this entry.
    pub logger: String,
    /// Urgency of the entry.
    pub severity: Severity,
    /// The message body. May span several lines.
    pub message: String,
    /// Contextual metadata for the entry.
    pub metadata: RecordMetadata,
}

impl LogEntry {
    /// Construct a new entry from logger `name`, `severity`, and `message`.
    pub fn new(logger: &str, severity: Severity, message: &str) -> Self {
        Self {
            logger: logger.to_owned(),
            severity,
            message: message.to_owned(),
            metadata: RecordMetadata::default(),
        }
    }

    /// Construct an entry with explicit source location and key-values.
    pub fn with_metadata(
        logger: &str,
        severity: Severity,
        message: &str,
        metadata: RecordMetadata,
    ) -> Self {
        Self {
            logger: logger.to_owned(),
            severity,
            message: message.to_owned(),
            metadata,
        }
    }

    /// Numeric severity code in `0..=7`.
    pub fn severity_code(&self) -> u8 {
        self.severity.code()
    }

    /// Creation time as whole seconds since the Unix epoch.
    pub fn unix_timestamp(&self) -> i64 {
        self.metadata
            .timestamp
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|dur| i64::try_from(dur.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.logger.is_empty() {
            write!(f, "[{}] {}", self.severity, self.message)
        } else {
            write!(f, "{} [{}] {}", self.logger, self.severity, self.message)
        }
    }
}
