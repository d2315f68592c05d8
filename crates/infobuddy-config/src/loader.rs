//! Config file loading, discovery, and validation.

use crate::{BuddyConfig, ConfigError};
use directories::UserDirs;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename.
const DEFAULT_CONFIG_FILE: &str = "infobuddy.json5";
/// Default config directory under the user home or repo root.
const DEFAULT_CONFIG_DIR: &str = ".infobuddy";

impl BuddyConfig {
    /// Load a config from a path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Load a config from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        let value: Value = json5::from_str(contents)?;
        let config: BuddyConfig = serde_json::from_value(value)?;
        let config = config.resolve_env();
        config.validate()?;
        Ok(config)
    }

    /// Load the discovered config for a working directory, or defaults when
    /// no config file exists.
    pub fn load_discovered(cwd: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match discover_config_path(cwd.as_ref()) {
            Some(path) => Self::load_from_path(path),
            None => {
                debug!("no config file discovered, using defaults");
                let config = BuddyConfig::default().resolve_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Apply environment fallbacks for secrets left unset in the file.
    fn resolve_env(mut self) -> Self {
        if self.remote.api_key.is_none() {
            self.remote.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if self.remote.assistant_id.is_none() {
            self.remote.assistant_id = std::env::var("ASSISTANT_ID").ok();
        }
        self
    }

    /// Validate field-level constraints.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                path: "remote.base_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.remote.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidField {
                path: "remote.poll_interval_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.remote.run_timeout_secs == 0 {
            return Err(ConfigError::InvalidField {
                path: "remote.run_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        for (username, password) in &self.auth.users {
            if password.is_empty() {
                return Err(ConfigError::InvalidField {
                    path: format!("auth.users.{username}"),
                    message: "password must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Locate the config file for a working directory.
///
/// Checks `<cwd>/infobuddy.json5`, then `<cwd>/.infobuddy/infobuddy.json5`,
/// then `~/.infobuddy/infobuddy.json5`.
pub fn discover_config_path(cwd: &Path) -> Option<PathBuf> {
    let candidates = [
        cwd.join(DEFAULT_CONFIG_FILE),
        cwd.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE),
    ];
    for candidate in candidates {
        if candidate.is_file() {
            debug!("discovered config: {}", candidate.display());
            return Some(candidate);
        }
    }
    let user_config = UserDirs::new()?
        .home_dir()
        .join(DEFAULT_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILE);
    if user_config.is_file() {
        debug!("discovered user config: {}", user_config.display());
        return Some(user_config);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_for_empty_config() {
        let config = BuddyConfig::load_from_str("{}").expect("load");
        assert_eq!(config.remote.base_url, "https://api.openai.com/v1");
        assert_eq!(config.remote.poll_interval_ms, 500);
        assert_eq!(config.remote.run_timeout_secs, 120);
        assert_eq!(config.feedback.dir, "feedback");
        assert_eq!(config.ui.title, "Info Buddy");
        assert!(config.auth.users.is_empty());
    }

    #[test]
    fn parses_json5_with_comments_and_users() {
        let contents = r#"{
            // operator accounts
            auth: { users: { demo: "hunter2" } },
            remote: { assistant_id: "asst_123", poll_interval_ms: 250 },
            ui: { title: "BN Buddy", logo_path: "logo.txt" },
        }"#;
        let config = BuddyConfig::load_from_str(contents).expect("load");
        assert_eq!(config.auth.users.get("demo").map(String::as_str), Some("hunter2"));
        assert_eq!(config.remote.assistant_id.as_deref(), Some("asst_123"));
        assert_eq!(config.remote.poll_interval_ms, 250);
        assert_eq!(config.ui.title, "BN Buddy");
        assert_eq!(config.ui.logo_path.as_deref(), Some("logo.txt"));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let err = BuddyConfig::load_from_str(r#"{ remote: { poll_interval_ms: 0 } }"#)
            .expect_err("should fail validation");
        assert!(err.to_string().contains("remote.poll_interval_ms"));
    }

    #[test]
    fn rejects_empty_password() {
        let err = BuddyConfig::load_from_str(r#"{ auth: { users: { demo: "" } } }"#)
            .expect_err("should fail validation");
        assert!(err.to_string().contains("auth.users.demo"));
    }

    #[test]
    fn discovers_cwd_config_first() {
        let temp = tempdir().expect("tempdir");
        let nested = temp.path().join(DEFAULT_CONFIG_DIR);
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(nested.join(DEFAULT_CONFIG_FILE), "{}").expect("write nested");
        std::fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{}").expect("write cwd");

        let found = discover_config_path(temp.path()).expect("discovered");
        assert_eq!(found, temp.path().join(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn load_discovered_falls_back_to_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = BuddyConfig::load_discovered(temp.path()).expect("load");
        assert_eq!(config.feedback.dir, "feedback");
    }
}
