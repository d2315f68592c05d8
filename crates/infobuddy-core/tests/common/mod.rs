//! Scripted fake for the remote assistant service.

use async_trait::async_trait;
use infobuddy_config::RemoteConfig;
use infobuddy_remote::{AssistantService, RemoteError, RunId, RunStatus, ThreadId, ThreadMessage};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fake assistant backend that follows a fixed status script.
pub struct ScriptedAssistant {
    thread_counter: AtomicUsize,
    /// Statuses returned by successive `run_status` calls; the last entry
    /// repeats once the script is exhausted.
    script: Mutex<Vec<RunStatus>>,
    cursor: AtomicUsize,
    reply: Option<ThreadMessage>,
    /// Messages appended through the service, for assertions.
    pub appended: Mutex<Vec<(ThreadId, String)>>,
}

impl ScriptedAssistant {
    /// A run that goes queued → in-progress → completed with a fixed reply.
    pub fn completing(reply: &str) -> Self {
        Self::new(
            vec![RunStatus::Queued, RunStatus::InProgress, RunStatus::Completed],
            Some(ThreadMessage {
                role: "assistant".to_string(),
                text: reply.to_string(),
            }),
        )
    }

    /// A run that fails after one in-progress poll.
    pub fn failing() -> Self {
        Self::new(vec![RunStatus::InProgress, RunStatus::Failed], None)
    }

    /// A run that never reaches a terminal status.
    pub fn never_finishing() -> Self {
        Self::new(vec![RunStatus::InProgress], None)
    }

    fn new(script: Vec<RunStatus>, reply: Option<ThreadMessage>) -> Self {
        Self {
            thread_counter: AtomicUsize::new(0),
            script: Mutex::new(script),
            cursor: AtomicUsize::new(0),
            reply,
            appended: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AssistantService for ScriptedAssistant {
    async fn create_thread(&self) -> Result<ThreadId, RemoteError> {
        let n = self.thread_counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ThreadId(format!("thread-{n}")))
    }

    async fn append_user_message(
        &self,
        thread_id: &ThreadId,
        content: &str,
    ) -> Result<(), RemoteError> {
        self.appended
            .lock()
            .expect("appended lock")
            .push((thread_id.clone(), content.to_string()));
        Ok(())
    }

    async fn start_run(
        &self,
        _thread_id: &ThreadId,
        _instructions: &str,
    ) -> Result<RunId, RemoteError> {
        self.cursor.store(0, Ordering::SeqCst);
        Ok(RunId("run-1".to_string()))
    }

    async fn run_status(
        &self,
        _thread_id: &ThreadId,
        _run_id: &RunId,
    ) -> Result<RunStatus, RemoteError> {
        let script = self.script.lock().expect("script lock");
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(script[index.min(script.len() - 1)])
    }

    async fn latest_message(
        &self,
        _thread_id: &ThreadId,
    ) -> Result<Option<ThreadMessage>, RemoteError> {
        Ok(self.reply.clone())
    }
}

/// Remote config with fast polling for tests.
pub fn test_remote_config() -> RemoteConfig {
    RemoteConfig {
        poll_interval_ms: 500,
        run_timeout_secs: 10,
        ..RemoteConfig::default()
    }
}
