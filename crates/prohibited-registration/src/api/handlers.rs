//! HTTP request handlers.

use super::types::{HealthResponse, InvokeRequest, InvokeResponse};
use super::AppState;
use crate::error::ServiceError;
use crate::member::parse_member;
use crate::queue::{handle_message, QueueMessage, SettlementRecorder};
use axum::{
    body::to_bytes,
    extract::{Request, State},
    Json,
};
use tracing::{error, info};

/// Largest debug request body accepted.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        storage_configured: state.sinks.audit_configured(),
        alert_configured: state.sinks.alert_configured(),
        topic_name: state.queue.topic_name.clone(),
        subscription_name: state.queue.subscription_name.clone(),
    })
}

/// Queue trigger invocation from the functions host.
///
/// Settlement is reported in `ReturnValue`. An error here is returned as a
/// non-2xx status so the host redelivers.
pub async fn queue_invocation(
    State(state): State<AppState>,
    Json(request): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, ServiceError> {
    let body = request.message_body().ok_or_else(|| {
        ServiceError::InvalidInvocation("no message binding in invocation data".to_string())
    })?;
    let message = QueueMessage::new(request.message_id(), body);

    let recorder = SettlementRecorder::new();
    handle_message(&state.sinks, &message, &recorder).await?;

    let settlement = recorder.settlement().await;
    Ok(Json(InvokeResponse {
        logs: vec![format!("Settled message: {:?}", settlement)],
        return_value: settlement,
        ..Default::default()
    }))
}

/// Manual test endpoint: runs one attempt through both sinks and reports
/// each outcome as plain text.
///
/// Returns 200 whenever the payload parses, regardless of sink outcomes.
pub async fn test_registration(
    State(state): State<AppState>,
    request: Request,
) -> Result<String, ServiceError> {
    info!("Testing prohibited registration processing");

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            error!(error = %e, "Test failed");
            ServiceError::Internal(format!("Failed to read request body: {}", e))
        })?;

    if body.is_empty() {
        return Err(ServiceError::EmptyBody);
    }

    let member = parse_member(&body)
        .inspect_err(|e| error!(error = %e, "JSON parsing failed"))?
        .ok_or(ServiceError::NullPayload)?;

    info!(
        email = member.email_text(),
        country = member.country_text(),
        "Processing prohibited registration"
    );

    let mut lines = vec![
        format!("Email: {}", member.email_text()),
        format!("Username: {}", member.username_text()),
        format!("Country: {}", member.country_text()),
        format!("Company ID: {}", member.company_id),
    ];

    let report = state.sinks.deliver(&member).await;
    lines.extend(report.lines());

    Ok(lines.join("\n"))
}
