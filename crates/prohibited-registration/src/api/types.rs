//! API request and response types.

use crate::queue::Settlement;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the trigger binding carrying the message body.
pub const MESSAGE_BINDING: &str = "message";

/// Invocation forwarded by the functions host for a queue trigger.
#[derive(Debug, Default, Deserialize)]
pub struct InvokeRequest {
    /// Trigger and input bindings, keyed by binding name
    #[serde(rename = "Data", default)]
    pub data: Map<String, Value>,

    /// Trigger metadata (`MessageId`, `DeliveryCount`, ...)
    #[serde(rename = "Metadata", default)]
    pub metadata: Map<String, Value>,
}

impl InvokeRequest {
    /// The message body as raw text.
    ///
    /// String bindings are used verbatim; any other JSON value is passed
    /// through re-serialized. Falls back to the only binding present when
    /// none is named [`MESSAGE_BINDING`].
    pub fn message_body(&self) -> Option<Vec<u8>> {
        let value = match self.data.get(MESSAGE_BINDING) {
            Some(value) => value,
            None if self.data.len() == 1 => self.data.values().next()?,
            None => return None,
        };

        match value {
            Value::String(text) => Some(text.clone().into_bytes()),
            other => Some(other.to_string().into_bytes()),
        }
    }

    pub fn message_id(&self) -> Option<String> {
        match self.metadata.get("MessageId")? {
            Value::String(id) => Some(id.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Response returned to the functions host.
#[derive(Debug, Default, Serialize)]
pub struct InvokeResponse {
    #[serde(rename = "Outputs")]
    pub outputs: Map<String, Value>,

    #[serde(rename = "Logs")]
    pub logs: Vec<String>,

    #[serde(rename = "ReturnValue")]
    pub return_value: Option<Settlement>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage_configured: bool,
    pub alert_configured: bool,
    pub topic_name: String,
    pub subscription_name: String,
}
