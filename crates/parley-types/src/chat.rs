//! Chat session, message, and prompt types for Parley.
//!
//! A session is a conversation thread keyed by a UUID string. It holds two
//! separate streams: prompts (session-level instruction turns) and messages
//! (ordinary conversational turns). Both are persisted; the merged display
//! view lives in [`crate::history`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Originator of a chat turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('user', 'assistant', 'system'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A conversation thread owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: i32,
    pub uuid: String,
    pub user_id: i32,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a chat session.
#[derive(Debug, Clone)]
pub struct CreateChatSessionParams {
    pub uuid: String,
    pub user_id: i32,
    pub topic: String,
}

/// A single conversational turn within a session.
///
/// `uuid` is globally unique and immutable after creation. `raw` carries the
/// provider-specific payload untouched (JSON `null` when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i32,
    pub uuid: String,
    pub chat_session_uuid: String,
    pub role: MessageRole,
    pub content: String,
    pub raw: serde_json::Value,
    pub token_count: i32,
    /// Pinned messages are always kept in the last-N context window.
    pub is_pin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for inserting a chat message.
#[derive(Debug, Clone)]
pub struct CreateChatMessageParams {
    pub chat_session_uuid: String,
    pub uuid: String,
    pub role: MessageRole,
    pub content: String,
    pub raw: serde_json::Value,
    pub token_count: i32,
}

/// Full update of a message addressed by numeric id.
#[derive(Debug, Clone)]
pub struct UpdateChatMessageParams {
    pub id: i32,
    pub role: MessageRole,
    pub content: String,
    pub raw: serde_json::Value,
    pub token_count: i32,
    pub is_pin: bool,
}

/// Content update of a message addressed by UUID.
#[derive(Debug, Clone)]
pub struct UpdateChatMessageByUuidParams {
    pub uuid: String,
    pub content: String,
    pub token_count: i32,
    pub is_pin: bool,
}

/// A session-level instruction turn, stored apart from ordinary messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub id: i32,
    pub uuid: String,
    pub chat_session_uuid: String,
    pub role: MessageRole,
    pub content: String,
    pub token_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for inserting a chat prompt.
#[derive(Debug, Clone)]
pub struct CreateChatPromptParams {
    pub chat_session_uuid: String,
    pub uuid: String,
    pub role: MessageRole,
    pub content: String,
    pub token_count: i32,
}

/// Content update of a prompt addressed by UUID.
#[derive(Debug, Clone)]
pub struct UpdateChatPromptByUuidParams {
    pub uuid: String,
    pub content: String,
    pub token_count: i32,
}
