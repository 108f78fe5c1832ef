//! Alert sink: Slack notification for each blocked registration attempt.

use crate::error::ServiceError;
use crate::member::Member;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slack_webhook::{SlackMessage, SlackWebhookClient};
use tracing::{debug, instrument};

/// Notification fallback text.
pub const ALERT_SUMMARY: &str = "A user attempted to register from a prohibited country.";

/// Notifies operators of registration attempts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Whether an alert endpoint is configured at all.
    fn is_configured(&self) -> bool;

    /// Send one alert for the attempt.
    async fn notify(&self, member: &Member) -> Result<(), ServiceError>;
}

/// Build the Slack message for an attempt detected at `now`.
pub fn build_alert(member: &Member, now: DateTime<Utc>) -> SlackMessage {
    let body = format!(
        "*Prohibited Registration Attempt*\n\n\
         Email: {}\n\
         Username: {}\n\
         Country: {}\n\
         Company ID: {}\n\
         Time: {} UTC",
        member.email_text(),
        member.username_text(),
        member.country_text(),
        member.company_id,
        now.format("%Y-%m-%d %H:%M:%S"),
    );

    SlackMessage::new(ALERT_SUMMARY).with_section(body)
}

/// Slack-backed alert sink sharing the process-wide webhook client.
pub struct SlackAlertSink {
    client: SlackWebhookClient,
    webhook_url: Option<String>,
}

impl SlackAlertSink {
    pub fn new(client: SlackWebhookClient, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl AlertSink for SlackAlertSink {
    fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    #[instrument(skip_all, fields(country = member.country_text()))]
    async fn notify(&self, member: &Member) -> Result<(), ServiceError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(ServiceError::AlertEndpointUnavailable)?;

        let message = build_alert(member, Utc::now());
        self.client.send(url, &message).await?;

        debug!("Slack alert sent");
        Ok(())
    }
}
