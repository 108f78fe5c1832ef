//! Slack incoming-webhook payload types.

use serde::{Deserialize, Serialize};

/// Top-level webhook payload.
///
/// `text` is the notification fallback shown by clients that cannot render
/// blocks; `blocks` carries the formatted body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlackMessage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl SlackMessage {
    /// Create a plain-text message with no blocks.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
        }
    }

    /// Append a markdown section block.
    pub fn with_section(mut self, markdown: impl Into<String>) -> Self {
        self.blocks.push(Block::section(markdown));
        self
    }
}

/// Layout block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Section { text: TextObject },
}

impl Block {
    pub fn section(markdown: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::markdown(markdown),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextKind,
    pub text: String,
}

impl TextObject {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Mrkdwn,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    Mrkdwn,
}
