//! Core data types shared across the session and feedback modules.

use chrono::{DateTime, Utc};
use infobuddy_remote::ThreadId;
use serde::{Deserialize, Serialize};

/// Speaker role for a transcript message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored message.
    User,
    /// Assistant-authored message.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Message stored in a session transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role that produced the message.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Timestamp for the message.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a user message timestamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Build an assistant message timestamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Thumbs rating attached to a feedback record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeedbackKind {
    #[serde(rename = "thumbs-up")]
    ThumbsUp,
    #[serde(rename = "thumbs-down")]
    ThumbsDown,
}

/// A submitted judgment: thumbs rating plus optional explanation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feedback {
    /// Rating type.
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    /// Optional free-text explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One persisted feedback entry, immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    /// ISO-8601 creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Thread the judged exchange belongs to.
    pub thread_id: ThreadId,
    /// Display alias of that thread.
    pub chat_alias: String,
    /// The user prompt of the judged exchange.
    pub user_message: String,
    /// The assistant reply of the judged exchange.
    pub assistant_response: String,
    /// The judgment itself.
    pub feedback: Feedback,
}
