//! Queue message handler: the production path.

use crate::dispatch::Sinks;
use crate::error::ServiceError;
use crate::member::parse_member;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Dead-letter reason for payloads that are not valid JSON.
pub const JSON_PARSE_ERROR: &str = "JsonParseError";

/// A delivered topic message.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub message_id: Option<String>,
    pub body: Vec<u8>,
}

impl QueueMessage {
    pub fn new(message_id: Option<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            message_id,
            body: body.into(),
        }
    }
}

/// Terminal actions on a delivered message.
#[async_trait]
pub trait MessageActions: Send + Sync {
    /// Acknowledge and remove the message.
    async fn complete(&self, message: &QueueMessage) -> Result<(), ServiceError>;

    /// Remove the message to the dead-letter queue.
    async fn dead_letter(
        &self,
        message: &QueueMessage,
        reason: &str,
        description: &str,
    ) -> Result<(), ServiceError>;
}

/// Handle one delivered message.
///
/// Malformed payloads are dead-lettered without touching either sink. A
/// `null` payload is acknowledged without side effects. Otherwise both sinks
/// are attempted and the message is acknowledged whatever their outcome.
/// Errors returned from here come from settling the message and are left
/// to the host's redelivery policy.
#[instrument(skip_all, fields(message_id = message.message_id.as_deref().unwrap_or("-")))]
pub async fn handle_message<A>(
    sinks: &Sinks,
    message: &QueueMessage,
    actions: &A,
) -> Result<(), ServiceError>
where
    A: MessageActions + ?Sized,
{
    info!("Processing prohibited registration attempt");

    let member = match parse_member(&message.body) {
        Ok(Some(member)) => member,
        Ok(None) => {
            warn!("Failed to deserialize message to Member object");
            return actions.complete(message).await;
        }
        Err(ServiceError::MalformedPayload(description)) => {
            error!(error = %description, "Failed to parse message as JSON");
            return actions
                .dead_letter(message, JSON_PARSE_ERROR, &description)
                .await;
        }
        Err(e) => return Err(e),
    };

    info!(
        email = member.email_text(),
        country = member.country_text(),
        "Prohibited registration"
    );

    let report = sinks.deliver(&member).await;
    if !report.all_succeeded() {
        warn!("Completing message with sink failures");
    }

    actions.complete(message).await.map_err(|e| {
        error!(error = %e, "Error processing prohibited registration");
        e
    })
}

/// How a message was settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Settlement {
    Completed,
    DeadLettered {
        #[serde(rename = "DeadLetterReason")]
        reason: String,
        #[serde(rename = "DeadLetterErrorDescription")]
        description: String,
    },
}

/// Delivery handle that records the settlement so it can be reported back
/// to the host. A message can be settled once.
#[derive(Debug, Default)]
pub struct SettlementRecorder {
    settlement: Mutex<Option<Settlement>>,
}

impl SettlementRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn settlement(&self) -> Option<Settlement> {
        self.settlement.lock().await.clone()
    }

    async fn settle(&self, settlement: Settlement) -> Result<(), ServiceError> {
        let mut slot = self.settlement.lock().await;
        if let Some(existing) = slot.as_ref() {
            return Err(ServiceError::Settlement(format!(
                "message already settled as {:?}",
                existing
            )));
        }
        *slot = Some(settlement);
        Ok(())
    }
}

#[async_trait]
impl MessageActions for SettlementRecorder {
    async fn complete(&self, _message: &QueueMessage) -> Result<(), ServiceError> {
        self.settle(Settlement::Completed).await
    }

    async fn dead_letter(
        &self,
        _message: &QueueMessage,
        reason: &str,
        description: &str,
    ) -> Result<(), ServiceError> {
        self.settle(Settlement::DeadLettered {
            reason: reason.to_string(),
            description: description.to_string(),
        })
        .await
    }
}
