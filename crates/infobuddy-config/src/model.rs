//! Configuration schema for infobuddy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root config for the infobuddy front-end.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuddyConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote conversation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL for the assistants API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key; falls back to `OPENAI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Assistant configuration id; falls back to `ASSISTANT_ID` when unset.
    #[serde(default)]
    pub assistant_id: Option<String>,
    /// Interval between run status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Overall deadline for a single run, in seconds.
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
    /// Instruction string sent with every run.
    #[serde(default)]
    pub instructions: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            assistant_id: None,
            poll_interval_ms: default_poll_interval_ms(),
            run_timeout_secs: default_run_timeout_secs(),
            instructions: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_run_timeout_secs() -> u64 {
    120
}

/// Static credential table for the login gate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Username to password mapping.
    #[serde(default)]
    pub users: HashMap<String, String>,
}

/// Feedback persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Directory that holds the monthly feedback files.
    #[serde(default = "default_feedback_dir")]
    pub dir: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            dir: default_feedback_dir(),
        }
    }
}

fn default_feedback_dir() -> String {
    "feedback".to_string()
}

/// Presentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Title shown in the header.
    #[serde(default = "default_title")]
    pub title: String,
    /// Tagline shown under the title.
    #[serde(default = "default_tagline")]
    pub tagline: String,
    /// Optional path to a text banner rendered in the sidebar.
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: default_tagline(),
            logo_path: None,
        }
    }
}

fn default_title() -> String {
    "Info Buddy".to_string()
}

fn default_tagline() -> String {
    "Ask me anything".to_string()
}
