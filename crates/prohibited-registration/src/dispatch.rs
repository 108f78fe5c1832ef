//! Shared sink invocation for both entry points.
//!
//! Each attempt is written to the audit sink and then sent to the alert
//! sink, strictly in that order. A failure in one never prevents the other.

use crate::alert::AlertSink;
use crate::audit::AuditSink;
use crate::error::ServiceError;
use crate::member::Member;
use std::sync::Arc;
use tracing::{error, warn};

/// The two side-effecting sinks.
#[derive(Clone)]
pub struct Sinks {
    audit: Arc<dyn AuditSink>,
    alert: Arc<dyn AlertSink>,
}

impl Sinks {
    pub fn new(audit: Arc<dyn AuditSink>, alert: Arc<dyn AlertSink>) -> Self {
        Self { audit, alert }
    }

    pub fn audit_configured(&self) -> bool {
        self.audit.is_configured()
    }

    pub fn alert_configured(&self) -> bool {
        self.alert.is_configured()
    }

    /// Persist the attempt.
    pub async fn record(&self, member: &Member) -> Result<(), ServiceError> {
        self.audit.record(member).await
    }

    /// Alert on the attempt.
    pub async fn notify(&self, member: &Member) -> Result<(), ServiceError> {
        self.alert.notify(member).await
    }

    /// Attempt both sinks and collect their outcomes.
    pub async fn deliver(&self, member: &Member) -> SinkReport {
        let audit = self.record(member).await;
        log_outcome("Database", &audit);

        let alert = self.notify(member).await;
        log_outcome("Slack", &alert);

        SinkReport { audit, alert }
    }
}

fn log_outcome(sink: &str, outcome: &Result<(), ServiceError>) {
    match outcome {
        Ok(()) => {}
        Err(e) if e.is_unconfigured() => warn!(sink, "{} - skipping", e),
        Err(e) => error!(sink, error = %e, "Sink failed"),
    }
}

/// Per-sink outcomes of one delivery.
#[derive(Debug)]
pub struct SinkReport {
    pub audit: Result<(), ServiceError>,
    pub alert: Result<(), ServiceError>,
}

impl SinkReport {
    pub fn all_succeeded(&self) -> bool {
        self.audit.is_ok() && self.alert.is_ok()
    }

    /// One human-readable line per sink, audit first.
    pub fn lines(&self) -> Vec<String> {
        let database = match &self.audit {
            Ok(()) => "Database: SUCCESS - Saved to database".to_string(),
            Err(e) => format!("Database: FAILED - {}", e),
        };
        let slack = match &self.alert {
            Ok(()) => "Slack: SUCCESS - Notification sent".to_string(),
            Err(e) => format!("Slack: FAILED - {}", e),
        };
        vec![database, slack]
    }
}
