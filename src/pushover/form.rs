//! Form encoding of Pushover request bodies.
//!
//! Values are encoded the way HTML forms are: unreserved characters pass
//! through, spaces become `+`, everything else is percent-encoded.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::client::Recipient;
use crate::message::OutboundMessage;
use crate::priority::PriorityTier;

/// Re-alert interval sent for emergency messages without an explicit retry.
pub(super) const DEFAULT_EMERGENCY_RETRY: u32 = 60;
/// Expiry sent for emergency messages without an explicit expire.
pub(super) const DEFAULT_EMERGENCY_EXPIRE: u32 = 3600;

/// Everything except RFC 3986 unreserved characters. Space is handled
/// separately by [`form_encode`].
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode a single form value, mapping spaces to `+` in the same pass.
pub(super) fn form_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut first = true;
    for chunk in s.split(' ') {
        if !first {
            result.push('+');
        }
        first = false;
        result.extend(utf8_percent_encode(chunk, FORM_ENCODE_SET));
    }
    result
}

/// Ordered form fields for one request.
#[derive(Debug, Default)]
pub(super) struct Form {
    pairs: Vec<(&'static str, String)>,
}

impl Form {
    pub(super) fn new(token: &str) -> Self {
        let mut form = Self::default();
        form.push("token", token);
        form
    }

    pub(super) fn push(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key, value.into()));
        self
    }

    pub(super) fn push_opt(&mut self, key: &'static str, value: Option<impl ToString>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub(super) fn with_recipient(mut self, recipient: &Recipient) -> Self {
        self.push("user", recipient.key());
        self.push_opt("device", recipient.device());
        self
    }

    /// Fields for `/messages.json`.
    pub(super) fn for_message(token: &str, message: &OutboundMessage) -> Self {
        let mut form = Self::new(token).with_recipient(&message.recipient);
        let priority = &message.priority;
        form.push("message", message.body.as_str())
            .push("priority", priority.tier().provider_code().to_string());
        if priority.tier() == PriorityTier::Emergency {
            form.push(
                "retry",
                priority.retry().unwrap_or(DEFAULT_EMERGENCY_RETRY).to_string(),
            )
            .push(
                "expire",
                priority.expire().unwrap_or(DEFAULT_EMERGENCY_EXPIRE).to_string(),
            );
        }
        form.push_opt("title", message.title.as_deref())
            .push_opt("url", message.url.as_deref())
            .push_opt("url_title", message.url_title.as_deref())
            .push_opt("timestamp", message.timestamp)
            .push_opt("sound", message.sound.as_ref().map(|s| s.as_str()));
        form
    }

    #[cfg(test)]
    pub(super) fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Serialise to an `application/x-www-form-urlencoded` body.
    pub(super) fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", form_encode(key), form_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
