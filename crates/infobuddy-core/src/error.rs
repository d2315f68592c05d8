//! Error types for the core crate.

use crate::feedback::FeedbackError;
use infobuddy_remote::{RemoteError, ThreadId};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by session, chat, and feedback operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No remote thread is active for the session.
    #[error("no active chat thread")]
    NoActiveThread,
    /// The thread id is not present in the session history.
    #[error("unknown chat: {0}")]
    UnknownChat(ThreadId),
    /// A remote service call failed.
    #[error("remote service error: {0}")]
    Remote(#[from] RemoteError),
    /// The assistant run reached a non-completed terminal status.
    #[error("assistant run ended with status {status}")]
    RunFailed {
        /// Terminal status label reported by the service.
        status: &'static str,
    },
    /// The assistant run did not finish before the configured deadline.
    #[error("assistant run timed out after {0:?}")]
    RunTimedOut(Duration),
    /// The run completed but the thread had no assistant reply.
    #[error("assistant returned no reply")]
    EmptyReply,
    /// Persisting a feedback record failed.
    #[error("feedback error: {0}")]
    Feedback(#[from] FeedbackError),
}
