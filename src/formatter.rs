//! Rendering of log entries into notification bodies.
//!
//! Provides the [`EntryFormatter`] trait alongside a shared trait-object
//! wrapper so one formatter instance can be handed to several writers.

use std::{fmt, sync::Arc};

use crate::log_record::LogEntry;

/// Trait for formatting log entries into strings.
///
/// Implementors must be thread-safe (`Send + Sync`) because a writer may be
/// shared between threads.
pub trait EntryFormatter: Send + Sync {
    /// Format a log entry into a string representation.
    fn format(&self, entry: &LogEntry) -> String;
}

/// Shared formatter trait object used by writers.
#[derive(Clone)]
pub struct SharedFormatter {
    inner: Arc<dyn EntryFormatter + Send + Sync>,
}

impl SharedFormatter {
    /// Create a shared formatter from an owned formatter implementation.
    pub fn new<F>(formatter: F) -> Self
    where
        F: EntryFormatter + Send + Sync + 'static,
    {
        let inner: Arc<dyn EntryFormatter + Send + Sync> = Arc::new(formatter);
        Self { inner }
    }

    /// Format an entry using the wrapped formatter instance.
    pub fn format(&self, entry: &LogEntry) -> String {
        self.inner.format(entry)
    }
}

impl Default for SharedFormatter {
    fn default() -> Self {
        Self::new(DefaultFormatter)
    }
}

impl fmt::Debug for SharedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedFormatter(<dyn EntryFormatter>)")
    }
}

/// Renders `"{logger} [{SEVERITY}] {message}"`.
#[derive(Copy, Clone, Debug)]
pub struct DefaultFormatter;

impl EntryFormatter for DefaultFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        entry.to_string()
    }
}

/// Renders only the message body, dropping logger and severity.
#[derive(Copy, Clone, Debug)]
pub struct MessageOnlyFormatter;

impl EntryFormatter for MessageOnlyFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        entry.message.clone()
    }
}

impl<F> EntryFormatter for F
where
    F: Fn(&LogEntry) -> String + Send + Sync,
{
    fn format(&self, entry: &LogEntry) -> String {
        self(entry)
    }
}
