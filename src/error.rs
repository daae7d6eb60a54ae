//! Errors surfaced by [`NotificationLogWriter`](crate::writer::NotificationLogWriter).
//!
//! Provider errors never escape in their own type: they are wrapped in
//! [`WriterError::DeliveryFailure`] with the original kept as the source.

use thiserror::Error;

use crate::client::ApiError;
use crate::priority::SeverityCodeOutOfRange;

/// Message used when recipient verification fails during construction.
pub const INVALID_RECIPIENT: &str = "recipient is not valid";

#[derive(Debug, Error)]
pub enum WriterError {
    /// The writer cannot be built or used with its current configuration.
    #[error("{0}")]
    InvalidConfiguration(String),
    /// The provider rejected or failed to deliver a message.
    #[error("{message}")]
    DeliveryFailure {
        /// Provider message, preserved verbatim.
        message: String,
        /// Provider error code.
        code: i32,
        #[source]
        source: ApiError,
    },
}

impl WriterError {
    pub(crate) fn delivery(source: ApiError) -> Self {
        Self::DeliveryFailure {
            message: source.message.clone(),
            code: source.code,
            source,
        }
    }

    /// Provider error code for delivery failures.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::InvalidConfiguration(_) => None,
            Self::DeliveryFailure { code, .. } => Some(*code),
        }
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, Self::DeliveryFailure { .. })
    }
}

impl From<SeverityCodeOutOfRange> for WriterError {
    fn from(err: SeverityCodeOutOfRange) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}
