//! Error types for the registration-attempt service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use slack_webhook::SlackError;
use thiserror::Error;

/// Service error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("JSON parsing failed: {0}")]
    MalformedPayload(String),

    #[error("Request body is empty. Send Member JSON object.")]
    EmptyBody,

    #[error("Failed to deserialize as Member object")]
    NullPayload,

    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    #[error("Storage connection string not configured")]
    StorageUnavailable,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Slack webhook URL not configured")]
    AlertEndpointUnavailable,

    #[error("Slack API returned {status}: {body}")]
    AlertDelivery { status: u16, body: String },

    #[error("Slack delivery failed: {0}")]
    AlertTransport(String),

    #[error("Message settlement failed: {0}")]
    Settlement(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Whether the error means a sink has no target configured, as opposed to
    /// the target failing.
    pub fn is_unconfigured(&self) -> bool {
        matches!(
            self,
            ServiceError::StorageUnavailable | ServiceError::AlertEndpointUnavailable
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MalformedPayload(_)
            | ServiceError::EmptyBody
            | ServiceError::NullPayload
            | ServiceError::InvalidInvocation(_) => StatusCode::BAD_REQUEST,
            ServiceError::StorageUnavailable | ServiceError::AlertEndpointUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::Storage(_)
            | ServiceError::AlertDelivery { .. }
            | ServiceError::AlertTransport(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Settlement(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

impl From<SlackError> for ServiceError {
    fn from(e: SlackError) -> Self {
        match e {
            SlackError::Api { status, body } => ServiceError::AlertDelivery { status, body },
            SlackError::Http(e) => ServiceError::AlertTransport(e.to_string()),
        }
    }
}
