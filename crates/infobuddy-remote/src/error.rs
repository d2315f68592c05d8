//! Error types for the remote client crate.

use thiserror::Error;

/// Errors returned by remote conversation service calls.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport-level failure (connect, timeout, TLS, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success response from the remote API.
    #[error("remote api error (status={status}): {message}")]
    Api { status: u16, message: String },
    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// The client was built without a required credential.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}
