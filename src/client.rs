//! Capability interface the writer needs from a notification provider.
//!
//! [`PushClient`] is the seam between the writer and a concrete transport.
//! The Pushover integration in [`crate::pushover`] implements it over HTTP;
//! tests use an in-memory fake.

use std::fmt;

use thiserror::Error;

use crate::message::OutboundMessage;
use crate::priority::{Priority, PriorityTier};

/// Alert sounds the provider ships with.
pub const KNOWN_SOUNDS: &[&str] = &[
    "pushover",
    "bike",
    "bugle",
    "cashregister",
    "classical",
    "cosmic",
    "falling",
    "gamelan",
    "incoming",
    "intermission",
    "magic",
    "mechanical",
    "pianobar",
    "siren",
    "spacealarm",
    "tugboat",
    "alien",
    "climb",
    "persistent",
    "echo",
    "updown",
    "vibrate",
    "none",
];

/// Error code used for failures that never reached the provider.
pub const LOCAL_ERROR_CODE: i32 = 0;

/// Failure reported by a [`PushClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct ApiError {
    pub message: String,
    pub code: i32,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// An error raised before any request was made.
    pub fn local(message: impl Into<String>) -> Self {
        Self::new(message, LOCAL_ERROR_CODE)
    }
}

/// Destination for notifications: a user or group key, optionally narrowed
/// to a single device.
#[derive(Clone, PartialEq, Eq)]
pub struct Recipient {
    key: String,
    device: Option<String>,
}

impl Recipient {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            device: None,
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }
}

impl fmt::Debug for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys are credentials; only show a short prefix.
        let prefix: String = self.key.chars().take(4).collect();
        f.debug_struct("Recipient")
            .field("key", &format_args!("{prefix}…"))
            .field("device", &self.device)
            .finish()
    }
}

/// A validated alert sound name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sound(String);

impl Sound {
    /// Validate `name` against [`KNOWN_SOUNDS`].
    pub fn from_name(name: &str) -> Result<Self, ApiError> {
        let normalised = name.trim().to_ascii_lowercase();
        if KNOWN_SOUNDS.contains(&normalised.as_str()) {
            Ok(Self(normalised))
        } else {
            Err(ApiError::local(format!("sound \"{name}\" is not supported")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Operations the writer calls on a notification provider.
///
/// `build_priority` and `resolve_sound` have default implementations using
/// the crate's own [`Priority`] and [`Sound`] validation; providers with a
/// different sound catalogue override `resolve_sound`.
pub trait PushClient {
    /// Value the provider returns for an accepted message.
    type Receipt;

    /// Check that `recipient` can receive notifications.
    fn verify_recipient(&self, recipient: &Recipient) -> Result<(), ApiError>;

    fn build_priority(&self, tier: PriorityTier) -> Priority {
        Priority::new(tier)
    }

    fn resolve_sound(&self, name: &str) -> Result<Sound, ApiError> {
        Sound::from_name(name)
    }

    /// Deliver a message. Called at most once per log entry.
    fn send(&self, message: &OutboundMessage) -> Result<Self::Receipt, ApiError>;
}

impl<C: PushClient + ?Sized> PushClient for &C {
    type Receipt = C::Receipt;

    fn verify_recipient(&self, recipient: &Recipient) -> Result<(), ApiError> {
        (**self).verify_recipient(recipient)
    }

    fn build_priority(&self, tier: PriorityTier) -> Priority {
        (**self).build_priority(tier)
    }

    fn resolve_sound(&self, name: &str) -> Result<Sound, ApiError> {
        (**self).resolve_sound(name)
    }

    fn send(&self, message: &OutboundMessage) -> Result<Self::Receipt, ApiError> {
        (**self).send(message)
    }
}

impl<C: PushClient + ?Sized> PushClient for std::sync::Arc<C> {
    type Receipt = C::Receipt;

    fn verify_recipient(&self, recipient: &Recipient) -> Result<(), ApiError> {
        (**self).verify_recipient(recipient)
    }

    fn build_priority(&self, tier: PriorityTier) -> Priority {
        (**self).build_priority(tier)
    }

    fn resolve_sound(&self, name: &str) -> Result<Sound, ApiError> {
        (**self).resolve_sound(name)
    }

    fn send(&self, message: &OutboundMessage) -> Result<Self::Receipt, ApiError> {
        (**self).send(message)
    }
}
