//! Pushover API response bodies.

use serde::Deserialize;

use crate::client::ApiError;

/// Acknowledgement for an accepted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Request identifier assigned by the provider.
    pub request: String,
    /// Receipt for acknowledging emergency messages, when one was issued.
    pub receipt: Option<String>,
}

/// Fields shared by every API response.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse {
    pub(super) status: i64,
    #[serde(default)]
    pub(super) request: String,
    #[serde(default)]
    pub(super) receipt: Option<String>,
    #[serde(default)]
    pub(super) errors: Vec<String>,
}

impl ApiResponse {
    /// Parse `body` returned with HTTP `status`.
    ///
    /// Non-JSON bodies become an error carrying the HTTP status.
    pub(super) fn parse(body: &str, http_status: u16) -> Result<Self, ApiError> {
        serde_json::from_str(body).map_err(|err| {
            ApiError::new(
                format!("unreadable response from Pushover: {err}"),
                i32::from(http_status),
            )
        })
    }

    /// Convert into a receipt, or an error for `status != 1`.
    pub(super) fn into_result(self, http_status: u16) -> Result<Receipt, ApiError> {
        if self.status == 1 && (200..300).contains(&http_status) {
            return Ok(Receipt {
                request: self.request,
                receipt: self.receipt,
            });
        }
        let message = if self.errors.is_empty() {
            format!("Pushover rejected the request (status {})", self.status)
        } else {
            self.errors.join("; ")
        };
        Err(ApiError::new(message, i32::from(http_status)))
    }
}
