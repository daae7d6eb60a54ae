//! Log writer that turns entries into push notifications.
//!
//! [`NotificationLogWriter`] verifies its recipient once at construction,
//! then for every entry derives a priority tier from the severity, builds an
//! [`OutboundMessage`] and hands it to the client. Each `write` makes at most
//! one delivery attempt.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;

use crate::{
    client::{PushClient, Recipient},
    error::{INVALID_RECIPIENT, WriterError},
    formatter::SharedFormatter,
    log_record::LogEntry,
    message::OutboundMessage,
    options::DeliveryOptions,
    priority::SeverityPriorityMap,
};

/// Forwards log entries to a [`PushClient`].
///
/// Options and the severity map are held behind `RwLock<Arc<_>>`: setters
/// swap the whole value and `write` takes one snapshot of each on entry, so
/// a concurrent update is either fully visible to a write or not at all.
pub struct NotificationLogWriter<C> {
    client: C,
    recipient: Recipient,
    formatter: SharedFormatter,
    options: RwLock<Arc<DeliveryOptions>>,
    levels: RwLock<Arc<SeverityPriorityMap>>,
}

impl<C: PushClient> NotificationLogWriter<C> {
    /// Verify `recipient` with `client` and build a writer.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError::InvalidConfiguration`] with the message
    /// `"recipient is not valid"` if verification fails for any reason.
    pub fn new(client: C, recipient: Recipient) -> Result<Self, WriterError> {
        if let Err(err) = client.verify_recipient(&recipient) {
            debug!("recipient verification failed: {err}");
            return Err(WriterError::InvalidConfiguration(
                INVALID_RECIPIENT.to_owned(),
            ));
        }
        Ok(Self {
            client,
            recipient,
            formatter: SharedFormatter::default(),
            options: RwLock::new(Arc::new(DeliveryOptions::default())),
            levels: RwLock::new(Arc::new(SeverityPriorityMap::default())),
        })
    }

    /// Use `formatter` to render entries into message bodies.
    pub fn with_formatter(mut self, formatter: SharedFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replace the delivery options. Values are not validated here.
    pub fn set_options(&self, options: DeliveryOptions) -> &Self {
        *self.options.write() = Arc::new(options);
        self
    }

    /// Replace the severity-to-tier map.
    pub fn set_severity_priority_map(&self, map: SeverityPriorityMap) -> &Self {
        *self.levels.write() = Arc::new(map);
        self
    }

    /// Current delivery options.
    pub fn options(&self) -> Arc<DeliveryOptions> {
        Arc::clone(&self.options.read())
    }

    /// Current severity-to-tier map.
    pub fn severity_priority_map(&self) -> Arc<SeverityPriorityMap> {
        Arc::clone(&self.levels.read())
    }

    /// Client the writer delivers through.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Recipient verified at construction.
    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    /// Assemble the message `write` would send for `entry`.
    ///
    /// # Errors
    ///
    /// * [`WriterError::InvalidConfiguration`] if the entry's severity has no
    ///   tier in the current map.
    /// * [`WriterError::DeliveryFailure`] if the configured sound is rejected
    ///   by the client.
    pub fn build_message(&self, entry: &LogEntry) -> Result<OutboundMessage, WriterError> {
        let options = self.options();
        let levels = self.severity_priority_map();
        self.assemble(entry, &options, &levels)
    }

    /// Deliver `entry` as a notification and return the provider's receipt.
    ///
    /// # Errors
    ///
    /// See [`build_message`](Self::build_message); any failure reported by
    /// [`PushClient::send`] becomes [`WriterError::DeliveryFailure`]. Nothing
    /// is retried.
    pub fn write(&self, entry: &LogEntry) -> Result<C::Receipt, WriterError> {
        let message = self.build_message(entry)?;
        match self.client.send(&message) {
            Ok(receipt) => {
                debug!(
                    "notification sent for {} entry from {:?}",
                    entry.severity, entry.logger
                );
                Ok(receipt)
            }
            Err(err) => {
                warn!("notification delivery failed: {err}");
                Err(WriterError::delivery(err))
            }
        }
    }

    fn assemble(
        &self,
        entry: &LogEntry,
        options: &DeliveryOptions,
        levels: &SeverityPriorityMap,
    ) -> Result<OutboundMessage, WriterError> {
        let tier = levels.get(entry.severity).ok_or_else(|| {
            WriterError::InvalidConfiguration(format!(
                "no priority tier mapped for severity code {}",
                entry.severity_code()
            ))
        })?;

        let mut priority = self.client.build_priority(tier);
        if let Some(retry) = options.retry {
            priority.set_retry(retry);
        }
        if let Some(expire) = options.expire {
            priority.set_expire(expire);
        }

        let text = self.formatter.format(entry);
        let mut message = OutboundMessage::new(self.recipient.clone(), priority, &text);
        message.title = options.title.clone();
        message.url = options.url.clone();
        message.url_title = options.url_title.clone();
        message.timestamp = options.timestamp;
        if let Some(name) = options.sound.as_deref() {
            let sound = self
                .client
                .resolve_sound(name)
                .map_err(WriterError::delivery)?;
            message.sound = Some(sound);
        }
        Ok(message)
    }
}

impl<C> fmt::Debug for NotificationLogWriter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationLogWriter")
            .field("recipient", &self.recipient)
            .field("options", &*self.options.read())
            .field("levels", &*self.levels.read())
            .finish_non_exhaustive()
    }
}
