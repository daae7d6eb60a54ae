//! Forward log entries to a push-notification service.
//!
//! [`NotificationLogWriter`] turns each [`LogEntry`] into one outbound
//! notification: the severity picks a priority tier through a
//! [`SeverityPriorityMap`], the formatted text becomes the body and the
//! configured [`DeliveryOptions`] are applied. The provider sits behind the
//! [`PushClient`] trait; [`PushoverClient`] talks to the Pushover API.
//!
//! The `log-compat` and `tracing-compat` features bridge the `log` and
//! `tracing` facades into any [`LogHandler`].

mod client;
mod error;
pub mod file_config;
mod formatter;
mod handler;
mod level;
#[cfg(feature = "log-compat")]
pub mod log_compat;
mod log_record;
mod message;
mod options;
mod priority;
mod pushover;
mod rate_limited_warner;
#[cfg(feature = "tracing-compat")]
pub mod tracing_compat;
mod writer;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use client::{ApiError, KNOWN_SOUNDS, LOCAL_ERROR_CODE, PushClient, Recipient, Sound};
pub use error::{INVALID_RECIPIENT, WriterError};
pub use file_config::{ConfigError, PushoverSettings};
pub use formatter::{DefaultFormatter, EntryFormatter, MessageOnlyFormatter, SharedFormatter};
pub use handler::LogHandler;
pub use level::{ParseSeverityError, Severity};
pub use log_record::{LogEntry, RecordMetadata};
pub use message::{MAX_MESSAGE_CHARS, OutboundMessage, truncate_chars};
pub use options::DeliveryOptions;
pub use priority::{
    ParseTierError, Priority, PriorityTier, SeverityCodeOutOfRange, SeverityPriorityMap,
};
pub use pushover::{DEFAULT_API_BASE, PushoverClient, PushoverConfig, Receipt};
pub use rate_limited_warner::{DEFAULT_WARN_INTERVAL, RateLimitedWarner};
pub use writer::NotificationLogWriter;

#[cfg(feature = "log-compat")]
pub use log_compat::PushLogAdapter;
#[cfg(feature = "tracing-compat")]
pub use tracing_compat::PushLayer;
