//! Configuration models and loading for infobuddy.
//!
//! This crate owns the infobuddy config schema, validation, and file
//! discovery used by the terminal front-end.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Config file discovery helpers.
pub use loader::discover_config_path;
/// Configuration schema models.
pub use model::*;
