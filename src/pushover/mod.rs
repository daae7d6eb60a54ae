//! Pushover integration of [`PushClient`](crate::client::PushClient).
//!
//! [`PushoverClient`] talks to the Pushover REST API with a blocking `ureq`
//! agent. Requests are `application/x-www-form-urlencoded`; responses are
//! JSON.
//!
//! # Failure Semantics
//!
//! Every call makes exactly one HTTP request. Nothing is retried.
//!
//! - **`status: 1`**: Success.
//! - **`status: 0` or non-2xx**: [`ApiError`](crate::client::ApiError) with
//!   the provider's `errors` joined into the message and the HTTP status as
//!   the code.
//! - **Transport failures**: [`ApiError`](crate::client::ApiError) with code
//!   [`LOCAL_ERROR_CODE`](crate::client::LOCAL_ERROR_CODE).

mod client;
mod config;
mod form;
mod response;

#[cfg(test)]
mod tests;

pub use client::PushoverClient;
pub use config::{DEFAULT_API_BASE, PushoverConfig};
pub use response::Receipt;
