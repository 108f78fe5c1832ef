//! Prohibited registration auditing service.
//!
//! Consumes blocked registration attempts published on a topic and, for each:
//! - persists a denormalized audit row to Postgres
//! - posts an alert to a Slack incoming webhook
//!
//! A manual test endpoint runs the same two sinks for a single posted
//! attempt and reports each outcome as plain text.

pub mod alert;
pub mod api;
pub mod audit;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod member;
pub mod queue;

pub use alert::{AlertSink, SlackAlertSink};
pub use audit::{AuditSink, PostgresAuditSink};
pub use config::Config;
pub use dispatch::{SinkReport, Sinks};
pub use error::ServiceError;
pub use member::{parse_member, Member};
pub use queue::{handle_message, MessageActions, QueueMessage, Settlement, SettlementRecorder};
