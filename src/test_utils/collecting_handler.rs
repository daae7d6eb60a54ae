//! A simple handler that accumulates entries in memory for test assertions.

use crate::error::WriterError;
use crate::handler::LogHandler;
use crate::log_record::LogEntry;
use parking_lot::Mutex;
use std::sync::Arc;

/// Handler that stores every entry it receives for later inspection.
///
/// Optionally fails every call so facade bridges' error reporting can be
/// exercised without a client.
#[derive(Clone, Default)]
pub struct CollectingHandler {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    failing: bool,
}

impl CollectingHandler {
    /// Create a new empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that rejects every entry after recording it.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Return a snapshot of all entries received so far.
    pub fn collected(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }
}

impl LogHandler for CollectingHandler {
    fn handle(&self, entry: &LogEntry) -> Result<(), WriterError> {
        self.entries.lock().push(entry.clone());
        if self.failing {
            return Err(WriterError::InvalidConfiguration(
                "collecting handler configured to fail".into(),
            ));
        }
        Ok(())
    }
}
