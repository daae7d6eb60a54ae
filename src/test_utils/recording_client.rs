//! In-memory [`PushClient`] that records every call.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::{ApiError, PushClient, Recipient, Sound};
use crate::message::OutboundMessage;

#[derive(Default)]
struct State {
    verified: Vec<Recipient>,
    sent: Vec<OutboundMessage>,
    send_attempts: u64,
    reject_recipients: Option<ApiError>,
    fail_sends: Option<ApiError>,
    reject_sounds: Option<ApiError>,
}

/// Fake client whose clones share state, so a test can keep one handle
/// while the writer owns another.
///
/// Successful sends return a receipt counting accepted messages from 1.
#[derive(Clone, Default)]
pub struct RecordingClient {
    state: Arc<Mutex<State>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every recipient verification with `error`.
    pub fn rejecting_recipients(self, error: ApiError) -> Self {
        self.state.lock().reject_recipients = Some(error);
        self
    }

    /// Fail every sound lookup with `error`.
    pub fn rejecting_sounds(self, error: ApiError) -> Self {
        self.state.lock().reject_sounds = Some(error);
        self
    }

    /// Fail every subsequent send with `error`.
    pub fn fail_sends_with(&self, error: ApiError) {
        self.state.lock().fail_sends = Some(error);
    }

    /// Let subsequent sends succeed again.
    pub fn succeed_sends(&self) {
        self.state.lock().fail_sends = None;
    }

    /// Recipients passed to `verify_recipient`, in call order.
    pub fn verified(&self) -> Vec<Recipient> {
        self.state.lock().verified.clone()
    }

    /// Messages accepted by `send`, in call order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.state.lock().sent.clone()
    }

    /// Number of `send` calls, successful or not.
    pub fn send_attempts(&self) -> u64 {
        self.state.lock().send_attempts
    }
}

impl PushClient for RecordingClient {
    type Receipt = u64;

    fn verify_recipient(&self, recipient: &Recipient) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.verified.push(recipient.clone());
        match &state.reject_recipients {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn resolve_sound(&self, name: &str) -> Result<Sound, ApiError> {
        if let Some(err) = &self.state.lock().reject_sounds {
            return Err(err.clone());
        }
        Sound::from_name(name)
    }

    fn send(&self, message: &OutboundMessage) -> Result<Self::Receipt, ApiError> {
        let mut state = self.state.lock();
        state.send_attempts += 1;
        if let Some(err) = &state.fail_sends {
            return Err(err.clone());
        }
        state.sent.push(message.clone());
        Ok(state.sent.len() as u64)
    }
}
