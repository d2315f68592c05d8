//! Session state, authentication, chat lifecycle, and feedback capture.
//!
//! Everything here operates on an explicit [`SessionContext`] passed in by
//! the caller; no ambient globals. The remote service is consumed through
//! the [`infobuddy_remote::AssistantService`] trait so tests can script it.

mod auth;
mod chat;
mod error;
mod feedback;
mod session;
mod types;

pub use auth::{CredentialGate, LOGIN_FAILED_MESSAGE};
pub use chat::{ChatManager, DEFAULT_RUN_INSTRUCTIONS};
pub use error::CoreError;
pub use feedback::{FeedbackError, FeedbackStore};
pub use session::{ChatThread, SessionContext};
pub use types::{ChatMessage, Feedback, FeedbackKind, FeedbackRecord, Role};
