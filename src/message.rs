//! Per-call notification payload.

use crate::client::{Recipient, Sound};
use crate::priority::Priority;

/// Longest message body, in characters, the provider accepts.
pub const MAX_MESSAGE_CHARS: usize = 1024;

/// Truncate `text` to its first `max_chars` characters.
///
/// Cuts on a character boundary; no attempt is made to break on words.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Message assembled fresh for each log entry and sent exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: Recipient,
    pub priority: Priority,
    pub body: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub url_title: Option<String>,
    pub timestamp: Option<i64>,
    pub sound: Option<Sound>,
}

impl OutboundMessage {
    /// Create a message whose body is `text` truncated to
    /// [`MAX_MESSAGE_CHARS`].
    pub fn new(recipient: Recipient, priority: Priority, text: &str) -> Self {
        Self {
            recipient,
            priority,
            body: truncate_chars(text, MAX_MESSAGE_CHARS).to_owned(),
            title: None,
            url: None,
            url_title: None,
            timestamp: None,
            sound: None,
        }
    }
}
