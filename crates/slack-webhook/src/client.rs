//! Slack webhook HTTP client.

use crate::error::SlackError;
use crate::types::SlackMessage;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Incoming-webhook client.
///
/// Holds a single connection-pooled [`reqwest::Client`]; clone it freely and
/// share it between concurrent callers instead of building one per request.
#[derive(Clone)]
pub struct SlackWebhookClient {
    client: Client,
}

impl SlackWebhookClient {
    /// Create a new client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, SlackError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client })
    }

    /// Post a message to a webhook URL.
    ///
    /// Exactly one request is issued; there is no retry.
    #[instrument(skip(self, webhook_url, message))]
    pub async fn send(&self, webhook_url: &str, message: &SlackMessage) -> Result<(), SlackError> {
        debug!(blocks = message.blocks.len(), "Posting Slack webhook message");

        // reqwest's `.json()` sets `Content-Type: application/json`
        let response = self.client.post(webhook_url).json(message).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Slack webhook rejected message");

            return Err(SlackError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Slack webhook message delivered");
        Ok(())
    }
}
