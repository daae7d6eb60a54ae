//! Bridge from `tracing` events to a [`LogHandler`].
//!
//! [`PushLayer`] is a `tracing_subscriber` layer; it does not filter for the
//! rest of the subscriber stack, it only decides which events it forwards.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::time::Duration;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::handler::{CRATE_TARGET, LogHandler, dispatch_once, is_dispatching, is_own_target};
use crate::level::Severity;
use crate::log_record::{LogEntry, RecordMetadata};
use crate::rate_limited_warner::RateLimitedWarner;

fn severity_from_tracing(level: &Level) -> Severity {
    if *level == Level::ERROR {
        Severity::Error
    } else if *level == Level::WARN {
        Severity::Warning
    } else if *level == Level::INFO {
        Severity::Informational
    } else {
        Severity::Debug
    }
}

/// Collects the `message` field and every other field as a key-value.
#[derive(Default)]
struct EntryVisitor {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl EntryVisitor {
    fn insert(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.insert(field.name().to_owned(), value);
        }
    }

    /// Message followed by ` key=value` for each field.
    fn rendered_message(&self) -> String {
        let mut out = self.message.clone().unwrap_or_default();
        for (key, value) in &self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{key}={value}");
        }
        out
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }
}

/// Layer forwarding events at or above a severity threshold.
pub struct PushLayer<H> {
    handler: H,
    min_severity: Severity,
    warner: RateLimitedWarner,
}

impl<H: LogHandler> PushLayer<H> {
    /// Forward `ERROR` events to `handler`.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            min_severity: Severity::Error,
            warner: RateLimitedWarner::default(),
        }
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.warner = RateLimitedWarner::new(interval);
        self
    }

    pub fn pending_failures(&self) -> u64 {
        self.warner.pending()
    }

    fn entry_from_event(event: &Event<'_>) -> LogEntry {
        let meta = event.metadata();
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        let message = visitor.rendered_message();
        let metadata = RecordMetadata {
            module_path: meta.module_path().unwrap_or_default().to_owned(),
            filename: meta.file().unwrap_or_default().to_owned(),
            line_number: meta.line().unwrap_or(0),
            key_values: visitor.fields,
            ..RecordMetadata::default()
        };
        LogEntry::with_metadata(
            meta.target(),
            severity_from_tracing(meta.level()),
            &message,
            metadata,
        )
    }
}

impl<S, H> Layer<S> for PushLayer<H>
where
    S: Subscriber,
    H: LogHandler + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if is_dispatching()
            || is_own_target(meta.target())
            || !severity_from_tracing(meta.level()).is_at_least(self.min_severity)
        {
            return;
        }
        let entry = Self::entry_from_event(event);
        if let Some(Err(err)) = dispatch_once(|| self.handler.handle(&entry)) {
            self.warner.record_failure();
            self.warner.warn_if_due(|count| {
                eprintln!("{CRATE_TARGET}: {count} notification(s) failed; last error: {err}");
            });
        }
    }
}
