//! Sink interface the logging facade bridges dispatch into.

#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
use std::cell::Cell;
use std::sync::Arc;

use crate::client::PushClient;
use crate::error::WriterError;
use crate::log_record::LogEntry;
use crate::writer::NotificationLogWriter;

/// Target prefix of records produced by this crate.
#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
pub(crate) const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Whether `target` names this crate or one of its modules. Bridges skip
/// such records so the writer never notifies about its own diagnostics.
#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
pub(crate) fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(CRATE_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Whether this thread is inside [`dispatch_once`].
#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
pub(crate) fn is_dispatching() -> bool {
    DISPATCHING.with(Cell::get)
}

/// Run `f` unless this thread is already dispatching an entry.
///
/// Anything a handler logs while delivering, including records from the
/// HTTP transport, re-enters the bridge on the same thread; those records
/// are dropped so one record causes at most one delivery.
#[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
pub(crate) fn dispatch_once<R>(f: impl FnOnce() -> R) -> Option<R> {
    struct Reset;

    impl Drop for Reset {
        fn drop(&mut self) {
            DISPATCHING.with(|flag| flag.set(false));
        }
    }

    if DISPATCHING.with(|flag| flag.replace(true)) {
        return None;
    }
    let _reset = Reset;
    Some(f())
}

/// Trait implemented by everything a facade bridge can forward entries to.
///
/// Unlike [`NotificationLogWriter::write`], `handle` discards the provider
/// receipt so the trait stays object safe.
pub trait LogHandler: Send + Sync {
    /// Dispatch a log entry for handling.
    fn handle(&self, entry: &LogEntry) -> Result<(), WriterError>;

    /// Flush any buffered entries. Handlers without buffering return `true`.
    fn flush(&self) -> bool {
        true
    }
}

impl<C> LogHandler for NotificationLogWriter<C>
where
    C: PushClient + Send + Sync,
{
    fn handle(&self, entry: &LogEntry) -> Result<(), WriterError> {
        self.write(entry).map(drop)
    }
}

impl<H: LogHandler + ?Sized> LogHandler for Arc<H> {
    fn handle(&self, entry: &LogEntry) -> Result<(), WriterError> {
        (**self).handle(entry)
    }

    fn flush(&self) -> bool {
        (**self).flush()
    }
}

impl<H: LogHandler + ?Sized> LogHandler for Box<H> {
    fn handle(&self, entry: &LogEntry) -> Result<(), WriterError> {
        (**self).handle(entry)
    }

    fn flush(&self) -> bool {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiError, Recipient};
    use crate::level::Severity;
    use crate::test_utils::RecordingClient;

    #[test]
    fn writer_handles_entries_through_trait_object() {
        let client = RecordingClient::default();
        let writer = NotificationLogWriter::new(client.clone(), Recipient::new("u"))
            .expect("recipient accepted");
        let handler: Box<dyn LogHandler> = Box::new(writer);
        handler
            .handle(&LogEntry::new("app", Severity::Error, "boom"))
            .expect("handled");
        assert!(handler.flush());
        assert_eq!(client.sent().len(), 1);
    }

    #[test]
    fn handler_propagates_delivery_failures() {
        let client = RecordingClient::default();
        client.fail_sends_with(ApiError::new("over quota", 429));
        let writer = NotificationLogWriter::new(client, Recipient::new("u"))
            .expect("recipient accepted");
        let err = writer
            .handle(&LogEntry::new("app", Severity::Error, "boom"))
            .unwrap_err();
        assert_eq!(err.code(), Some(429));
    }

    #[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
    #[test]
    fn nested_dispatch_is_skipped() {
        let mut inner_ran = false;
        let outer = dispatch_once(|| {
            assert!(is_dispatching());
            dispatch_once(|| inner_ran = true)
        });
        assert_eq!(outer, Some(None));
        assert!(!inner_ran);
        assert!(!is_dispatching());
        assert_eq!(dispatch_once(|| 7), Some(7));
    }

    #[cfg(any(feature = "log-compat", feature = "tracing-compat"))]
    #[test]
    fn flag_is_cleared_after_a_panicking_dispatch() {
        let result = std::panic::catch_unwind(|| dispatch_once::<()>(|| panic!("handler panicked")));
        assert!(result.is_err());
        assert!(!is_dispatching());
    }
}
