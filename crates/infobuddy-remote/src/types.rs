//! Wire types for the assistants v2 protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote-issued identifier for a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThreadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Remote-issued identifier for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a run, as reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Whether the run has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Incomplete
                | RunStatus::Expired
        )
    }

    /// Lowercase label used in error messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message fetched from a thread, flattened to its text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    /// Role reported by the service ("user" or "assistant").
    pub role: String,
    /// Concatenated text content of the message.
    pub text: String,
}

// Response envelopes, pared down to the fields the client reads.

/// `POST /threads` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ThreadObject {
    pub id: ThreadId,
}

/// `POST /threads/{id}/runs` and run retrieval response.
#[derive(Debug, Deserialize)]
pub(crate) struct RunObject {
    pub id: RunId,
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunLastError>,
}

/// Error detail attached to a failed run.
#[derive(Debug, Deserialize)]
pub(crate) struct RunLastError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /threads/{id}/messages` response.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageList {
    #[serde(default)]
    pub data: Vec<MessageObject>,
}

/// A single message object on a thread.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageObject {
    pub role: String,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

impl MessageObject {
    /// Flatten the content parts into a single text body.
    pub fn into_thread_message(self) -> ThreadMessage {
        let text = self
            .content
            .into_iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.value),
                ContentPart::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        ThreadMessage {
            role: self.role,
            text,
        }
    }
}

/// One content part of a message; only text parts carry a body.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

/// Text payload inside a content part.
#[derive(Debug, Deserialize)]
pub(crate) struct TextContent {
    pub value: String,
}

/// Error envelope returned on non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

/// Error body inside the envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}
