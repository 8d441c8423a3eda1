//! Chat transcript models.

use serde::{Deserialize, Serialize};

/// Who wrote a chat turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Bot,
    /// Anything that is not the bot is rendered as the user
    #[serde(other)]
    User,
}

/// One turn of a chat transcript. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    #[serde(default)]
    pub content: String,
}

impl ChatTurn {
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}
