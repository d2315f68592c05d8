//! Append-only feedback persistence, one JSON array file per month.

use crate::error::CoreError;
use crate::session::SessionContext;
use crate::types::{Feedback, FeedbackRecord};
use chrono::Utc;
use infobuddy_remote::ThreadId;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by the feedback store.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding records to JSON failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Writes feedback records to `feedback_<YYYYMM>.json` files under one
/// directory. Records are appended by rewriting the whole array; concurrent
/// writers are last-writer-wins (single-operator assumption).
pub struct FeedbackStore {
    dir: PathBuf,
}

impl FeedbackStore {
    /// Create a store rooted at a directory. The directory is created
    /// lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file for the current month.
    pub fn current_file(&self) -> PathBuf {
        self.dir
            .join(format!("feedback_{}.json", Utc::now().format("%Y%m")))
    }

    /// Build a record from the session's active chat and persist it.
    /// Fails with [`CoreError::NoActiveThread`] when no chat is active.
    pub fn save_for_session(
        &self,
        session: &SessionContext,
        user_message: impl Into<String>,
        assistant_response: impl Into<String>,
        feedback: Feedback,
    ) -> Result<PathBuf, CoreError> {
        let thread_id = session.thread_id.clone().ok_or(CoreError::NoActiveThread)?;
        self.save_for_thread(session, thread_id, user_message, assistant_response, feedback)
    }

    /// Build a record for an explicit thread and persist it. Used when the
    /// judged exchange may no longer belong to the active chat.
    pub fn save_for_thread(
        &self,
        session: &SessionContext,
        thread_id: ThreadId,
        user_message: impl Into<String>,
        assistant_response: impl Into<String>,
        feedback: Feedback,
    ) -> Result<PathBuf, CoreError> {
        let chat_alias = session
            .chat(&thread_id)
            .map(|chat| chat.alias.clone())
            .unwrap_or_default();
        let record = FeedbackRecord {
            timestamp: Utc::now(),
            thread_id,
            chat_alias,
            user_message: user_message.into(),
            assistant_response: assistant_response.into(),
            feedback,
        };
        Ok(self.save(record)?)
    }

    /// Append a record to the current month's file and rewrite it,
    /// pretty-printed. A missing file starts an empty array; an unreadable
    /// one is preserved under a `.corrupt-<epoch-millis>` name before a
    /// fresh array is written.
    pub fn save(&self, record: FeedbackRecord) -> Result<PathBuf, FeedbackError> {
        fs::create_dir_all(&self.dir)?;
        let file = self.current_file();
        let mut records = load_existing(&file)?;
        records.push(record);
        let body = serde_json::to_string_pretty(&records)?;
        fs::write(&file, body)?;
        info!(
            "feedback saved (file={}, records={})",
            file.display(),
            records.len()
        );
        Ok(file)
    }
}

/// Read the existing array, setting aside a file that no longer parses.
fn load_existing(file: &Path) -> Result<Vec<FeedbackRecord>, FeedbackError> {
    if !file.exists() {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(file)?;
    match serde_json::from_str(&contents) {
        Ok(records) => Ok(records),
        Err(err) => {
            let aside = corrupt_aside_path(file);
            warn!(
                "feedback file unreadable, setting aside (file={}, aside={}, error={})",
                file.display(),
                aside.display(),
                err
            );
            fs::rename(file, &aside)?;
            Ok(Vec::new())
        }
    }
}

fn corrupt_aside_path(file: &Path) -> PathBuf {
    let mut name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "feedback.json".to_string());
    name.push_str(&format!(".corrupt-{}", Utc::now().timestamp_millis()));
    file.with_file_name(name)
}
