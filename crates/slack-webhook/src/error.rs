//! Slack webhook client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack API returned {status}: {body}")]
    Api { status: u16, body: String },
}
