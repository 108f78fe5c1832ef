//! Audit sink: one Postgres row per blocked registration attempt.

use crate::error::ServiceError;
use crate::member::Member;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{Connection, PgConnection};
use tracing::{debug, instrument, warn};

/// Placeholder persisted for absent email, username or country code.
pub const UNKNOWN: &str = "unknown";

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS prohibited_registration_attempts (
    id SERIAL PRIMARY KEY,
    email VARCHAR(255),
    username VARCHAR(255),
    country_code VARCHAR(10),
    company_id INTEGER,
    detected_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    raw_data JSONB
)"#;

const INSERT_SQL: &str = r#"
INSERT INTO prohibited_registration_attempts (email, username, country_code, company_id, raw_data)
VALUES ($1, $2, $3, $4, $5)"#;

/// Persists registration attempts.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Whether a storage target is configured at all.
    fn is_configured(&self) -> bool;

    /// Append one audit row for the attempt.
    async fn record(&self, member: &Member) -> Result<(), ServiceError>;
}

/// Denormalized columns of an audit row. `id` and `detected_at` are assigned
/// by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub country_code: &'a str,
    pub company_id: i32,
    pub raw_data: &'a Member,
}

impl<'a> AuditRow<'a> {
    pub fn from_member(member: &'a Member) -> Self {
        Self {
            email: member.email.as_deref().unwrap_or(UNKNOWN),
            username: member.username.as_deref().unwrap_or(UNKNOWN),
            country_code: member.country_code.as_deref().unwrap_or(UNKNOWN),
            company_id: member.company_id,
            raw_data: member,
        }
    }
}

/// Postgres-backed audit sink.
///
/// A connection is opened per call and closed before returning; on error
/// paths it is dropped, which also releases it. There is no pool. A failure
/// to close after the insert succeeded is only logged.
pub struct PostgresAuditSink {
    connection_string: Option<String>,
}

impl PostgresAuditSink {
    pub fn new(connection_string: Option<String>) -> Self {
        Self { connection_string }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    fn is_configured(&self) -> bool {
        self.connection_string.is_some()
    }

    #[instrument(skip_all, fields(country = member.country_text()))]
    async fn record(&self, member: &Member) -> Result<(), ServiceError> {
        let url = self
            .connection_string
            .as_deref()
            .ok_or(ServiceError::StorageUnavailable)?;

        let row = AuditRow::from_member(member);

        let mut conn = PgConnection::connect(url).await?;

        sqlx::query(CREATE_TABLE_SQL).execute(&mut conn).await?;

        let inserted = sqlx::query(INSERT_SQL)
            .bind(row.email)
            .bind(row.username)
            .bind(row.country_code)
            .bind(row.company_id)
            .bind(Json(row.raw_data))
            .execute(&mut conn)
            .await
            .map(|result| result.rows_affected());

        // Dropping the connection on an insert error releases it without a close.
        let closed = match inserted {
            Ok(_) => conn.close().await,
            Err(_) => Ok(()),
        };

        let rows = insert_outcome(inserted, closed)?;
        debug!(rows, "Audit row inserted");
        Ok(())
    }
}

/// The insert decides the outcome. A close failure after the row is
/// committed is only logged, so the row is not reported as lost.
fn insert_outcome(
    inserted: Result<u64, sqlx::Error>,
    closed: Result<(), sqlx::Error>,
) -> Result<u64, ServiceError> {
    let rows = inserted?;
    if let Err(e) = closed {
        warn!(error = %e, "Failed to close audit connection");
    }
    Ok(rows)
}
