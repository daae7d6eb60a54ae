//! Blocking HTTP client for the Pushover API.

use std::sync::Arc;

use log::debug;
use ureq::{Agent, AgentBuilder};

use crate::client::{ApiError, PushClient, Recipient};
use crate::message::OutboundMessage;

use super::config::PushoverConfig;
use super::form::Form;
use super::response::{ApiResponse, Receipt};

const VALIDATE_PATH: &str = "users/validate.json";
const MESSAGES_PATH: &str = "messages.json";

/// [`PushClient`] backed by the Pushover REST API.
///
/// The `ureq` agent pools connections, so one client should be reused for
/// the lifetime of the writer.
#[derive(Debug)]
pub struct PushoverClient {
    config: PushoverConfig,
    agent: Agent,
}

impl PushoverClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Fails if the platform TLS stack cannot be initialised.
    pub fn new(config: PushoverConfig) -> Result<Self, ApiError> {
        let connector = native_tls::TlsConnector::new()
            .map_err(|err| ApiError::local(format!("failed to initialise TLS: {err}")))?;
        let agent = AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout(config.timeout)
            .tls_connector(Arc::new(connector))
            .build();
        Ok(Self { config, agent })
    }

    pub fn config(&self) -> &PushoverConfig {
        &self.config
    }

    fn post(&self, path: &str, form: &Form) -> Result<Receipt, ApiError> {
        let url = self.config.endpoint(path);
        debug!("POST {url}");
        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_string(&form.encode());

        let (status, response) = match result {
            Ok(response) => (response.status(), response),
            Err(ureq::Error::Status(code, response)) => (code, response),
            Err(ureq::Error::Transport(err)) => {
                return Err(ApiError::local(format!("request to {path} failed: {err}")));
            }
        };
        let body = response.into_string().map_err(|err| {
            ApiError::new(
                format!("failed to read response body: {err}"),
                i32::from(status),
            )
        })?;
        ApiResponse::parse(&body, status)?.into_result(status)
    }
}

impl PushClient for PushoverClient {
    type Receipt = Receipt;

    fn verify_recipient(&self, recipient: &Recipient) -> Result<(), ApiError> {
        let form = Form::new(&self.config.token).with_recipient(recipient);
        self.post(VALIDATE_PATH, &form).map(drop)
    }

    fn send(&self, message: &OutboundMessage) -> Result<Receipt, ApiError> {
        let form = Form::for_message(&self.config.token, message);
        self.post(MESSAGES_PATH, &form)
    }
}
