//! Client for the remote conversation API.
//!
//! The remote service is an opaque capability behind [`AssistantService`]:
//! allocate a thread, append a user message, start a run, poll its status,
//! and fetch the newest message. Any compatible backend is interchangeable;
//! [`OpenAiAssistantClient`] speaks the OpenAI Assistants v2 wire protocol.

mod client;
mod error;
mod types;

pub use client::OpenAiAssistantClient;
pub use error::RemoteError;
pub use types::{RunId, RunStatus, ThreadId, ThreadMessage};

use async_trait::async_trait;

/// Remote conversation service consumed by the chat pipeline.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Allocate a new conversation thread.
    async fn create_thread(&self) -> Result<ThreadId, RemoteError>;

    /// Append a user-authored message to a thread.
    async fn append_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), RemoteError>;

    /// Start a run of the assistant against a thread.
    async fn start_run(
        &self,
        thread_id: &ThreadId,
        instructions: &str,
    ) -> Result<RunId, RemoteError>;

    /// Retrieve the current status of a run.
    async fn run_status(
        &self,
        thread_id: &ThreadId,
        run_id: &RunId,
    ) -> Result<RunStatus, RemoteError>;

    /// Fetch the most recent message on a thread, if any.
    async fn latest_message(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<ThreadMessage>, RemoteError>;
}
