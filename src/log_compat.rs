//! Compatibility bridge for the Rust `log` crate.
//!
//! [`PushLogAdapter`] implements `log::Log` and forwards records at or above
//! a severity threshold to a [`LogHandler`], normally a
//! [`NotificationLogWriter`](crate::writer::NotificationLogWriter). Records
//! emitted by this crate itself are skipped so a failing delivery cannot
//! notify about its own failure, and so is anything logged on the thread
//! while a delivery is in progress.

use std::borrow::Cow;
use std::time::Duration;

use log::{Metadata, Record, SetLoggerError};

use crate::handler::{CRATE_TARGET, LogHandler, dispatch_once, is_dispatching, is_own_target};
use crate::level::{Severity, to_level_filter};
use crate::log_record::{LogEntry, RecordMetadata};
use crate::rate_limited_warner::RateLimitedWarner;

fn normalise_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

/// Adapter implementing the Rust `log::Log` trait.
pub struct PushLogAdapter<H> {
    handler: H,
    min_severity: Severity,
    warner: RateLimitedWarner,
}

impl<H: LogHandler> PushLogAdapter<H> {
    /// Forward `Error` records to `handler`.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            min_severity: Severity::Error,
            warner: RateLimitedWarner::default(),
        }
    }

    /// Forward records at least as urgent as `severity`.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Minimum gap between failure reports on stderr.
    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.warner = RateLimitedWarner::new(interval);
        self
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Deliveries that failed since the last report.
    pub fn pending_failures(&self) -> u64 {
        self.warner.pending()
    }

    fn accepts(&self, metadata: &Metadata<'_>) -> bool {
        !is_dispatching()
            && !is_own_target(metadata.target())
            && Severity::from(metadata.level()).is_at_least(self.min_severity)
    }
}

fn entry_from_record(record: &Record<'_>) -> LogEntry {
    let metadata = RecordMetadata {
        module_path: record.module_path().unwrap_or_default().to_string(),
        filename: record.file().unwrap_or_default().to_string(),
        line_number: record.line().unwrap_or(0),
        ..Default::default()
    };
    LogEntry::with_metadata(
        &normalise_target(record.target()),
        Severity::from(record.level()),
        &record.args().to_string(),
        metadata,
    )
}

impl<H: LogHandler> log::Log for PushLogAdapter<H> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.accepts(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.accepts(record.metadata()) {
            return;
        }
        let entry = entry_from_record(record);
        if let Some(Err(err)) = dispatch_once(|| self.handler.handle(&entry)) {
            self.warner.record_failure();
            self.warner.warn_if_due(|count| {
                eprintln!("{CRATE_TARGET}: {count} notification(s) failed; last error: {err}");
            });
        }
    }

    fn flush(&self) {
        self.handler.flush();
        self.warner.flush(|count| {
            eprintln!("{CRATE_TARGET}: {count} notification(s) failed since the last report");
        });
    }
}

/// Install `adapter` as the global `log` logger.
///
/// Raises `log::max_level` to the adapter's threshold.
///
/// # Errors
///
/// Fails if a global logger is already installed.
pub fn install<H: LogHandler + 'static>(adapter: PushLogAdapter<H>) -> Result<(), SetLoggerError> {
    let filter = to_level_filter(adapter.min_severity);
    log::set_boxed_logger(Box::new(adapter))?;
    log::set_max_level(filter);
    Ok(())
}
