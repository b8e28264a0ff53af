//! Chat messages and role filtering.

use serde::{Deserialize, Serialize};

/// Conversation role. Closed set: anything else fails deserialization,
/// so malformed message entries are rejected at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One conversation entry. Ordering within a conversation is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Remove every system-role message, preserving the relative order of the rest.
///
/// System entries are instructions for the model, not dialogue turns; the
/// upstream request must never contain them.
pub fn strip_system_messages(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    messages
        .into_iter()
        .filter(|m| m.role != Role::System)
        .collect()
}
