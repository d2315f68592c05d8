//! Thread lifecycle and the assistant response pipeline.

use crate::error::CoreError;
use crate::session::SessionContext;
use infobuddy_config::RemoteConfig;
use infobuddy_remote::{AssistantService, RunStatus, ThreadId};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Instruction string sent with every run unless overridden in config.
pub const DEFAULT_RUN_INSTRUCTIONS: &str =
    "Answer using provided file knowledge. Use **bold** or _underline_ for extra info.";

/// Drives chat creation, deletion, and assistant turns against the remote
/// service. Holds no session state of its own.
#[derive(Clone)]
pub struct ChatManager {
    service: Arc<dyn AssistantService>,
    instructions: String,
    poll_interval: Duration,
    run_deadline: Duration,
}

impl ChatManager {
    /// Build a manager over a remote service with the configured polling
    /// parameters.
    pub fn new(service: Arc<dyn AssistantService>, config: &RemoteConfig) -> Self {
        Self {
            service,
            instructions: config
                .instructions
                .clone()
                .unwrap_or_else(|| DEFAULT_RUN_INSTRUCTIONS.to_string()),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            run_deadline: Duration::from_secs(config.run_timeout_secs),
        }
    }

    /// Allocate a new remote thread and register it in the session. On
    /// failure the session is left untouched.
    pub async fn start_new_chat(
        &self,
        session: &mut SessionContext,
    ) -> Result<ThreadId, CoreError> {
        let thread_id = self.service.create_thread().await?;
        session.begin_thread(thread_id.clone());
        Ok(thread_id)
    }

    /// Remove the currently selected chat. When it also backed the active
    /// remote thread, a replacement thread is started immediately so the
    /// session is never left without one. Returns the replacement id, if a
    /// replacement was created.
    pub async fn delete_current_chat(
        &self,
        session: &mut SessionContext,
    ) -> Result<Option<ThreadId>, CoreError> {
        let Some(current) = session.current_chat.clone() else {
            return Ok(None);
        };
        let was_active = session.thread_id.as_ref() == Some(&current);
        if !session.delete_chat(&current) {
            return Err(CoreError::UnknownChat(current));
        }
        if was_active {
            let replacement = self.start_new_chat(session).await?;
            return Ok(Some(replacement));
        }
        session.current_chat = session.thread_id.clone();
        Ok(None)
    }

    /// Run one assistant turn against the session's active thread and
    /// return the reply text. Mutates no session state; the caller appends
    /// to the transcript after success.
    pub async fn process_assistant_response(
        &self,
        session: &SessionContext,
        prompt: &str,
    ) -> Result<String, CoreError> {
        let thread_id = session.thread_id.clone().ok_or(CoreError::NoActiveThread)?;
        self.run_turn(&thread_id, prompt).await
    }

    /// Run one assistant turn against an explicit thread: append the
    /// prompt, start a run, poll to a terminal status under the deadline,
    /// and fetch the newest message.
    pub async fn run_turn(&self, thread_id: &ThreadId, prompt: &str) -> Result<String, CoreError> {
        self.service.append_user_message(thread_id, prompt).await?;
        let run_id = self.service.start_run(thread_id, &self.instructions).await?;
        debug!(
            "awaiting run (thread_id={}, run_id={}, deadline={:?})",
            thread_id, run_id, self.run_deadline
        );

        let deadline = Instant::now() + self.run_deadline;
        loop {
            let status = self.service.run_status(thread_id, &run_id).await?;
            match status {
                RunStatus::Completed => break,
                status if status.is_terminal() => {
                    warn!(
                        "run ended without completion (run_id={}, status={})",
                        run_id, status
                    );
                    return Err(CoreError::RunFailed {
                        status: status.as_str(),
                    });
                }
                _ => {}
            }
            if Instant::now() >= deadline {
                warn!("run deadline exceeded (run_id={})", run_id);
                return Err(CoreError::RunTimedOut(self.run_deadline));
            }
            sleep(self.poll_interval).await;
        }

        let message = self
            .service
            .latest_message(thread_id)
            .await?
            .ok_or(CoreError::EmptyReply)?;
        info!(
            "turn completed (thread_id={}, reply_len={})",
            thread_id,
            message.text.len()
        );
        Ok(message.text)
    }
}
