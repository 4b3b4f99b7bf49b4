use serde::{Deserialize, Serialize};

use crate::types::Source;

/// Who authored a transcript entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of a conversation transcript.
///
/// Messages are immutable once appended to a session.  Sources are only ever
/// attached to assistant messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// The role of the message.
    pub role: MessageRole,

    /// The text of the message.
    pub content: String,

    /// Citations backing an assistant answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            sources: None,
        }
    }

    /// Create a new assistant message with optional sources.
    pub fn assistant(content: impl Into<String>, sources: Option<Vec<Source>>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            sources,
        }
    }

    /// Returns true if this is a user message.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Returns true if this is an assistant message.
    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// The cited sources, or an empty slice when there are none.
    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or(&[])
    }

    /// Returns true if the message carries at least one source.
    pub fn has_sources(&self) -> bool {
        !self.sources().is_empty()
    }
}
