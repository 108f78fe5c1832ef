//! Slack incoming-webhook client.

mod client;
mod error;
mod types;

pub use client::SlackWebhookClient;
pub use error::SlackError;
pub use types::*;
