//! Moderator configuration

use crate::generator::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which classifier answers comments the pre-filter lets through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModerationMode {
    /// Ask the remote model, falling back to the heuristic per comment
    #[default]
    Remote,
    /// Keyword heuristic only, no network access
    Heuristic,
}

/// Configuration for building a [`ContentModerator`](crate::ContentModerator)
/// and running a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratorConfig {
    /// Classifier variant
    #[serde(default)]
    pub mode: ModerationMode,

    /// Gemini API key (required in remote mode)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Remote model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Remote API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Minimum pause before each remote call, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Run the profanity pre-filter before classification
    #[serde(default = "default_true")]
    pub use_profanity_filter: bool,

    /// Extra words for the pre-filter, one per line
    #[serde(default)]
    pub profanity_wordlist: Option<PathBuf>,

    /// Column holding the comment text
    #[serde(default = "default_text_field")]
    pub text_field: String,

    /// Emit a progress notification every N rows
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl ModeratorConfig {
    /// Offline configuration with defaults for everything else
    pub fn heuristic() -> Self {
        Self {
            mode: ModerationMode::Heuristic,
            ..Self::default()
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ModeratorConfig {
    fn default() -> Self {
        Self {
            mode: ModerationMode::default(),
            api_key: None,
            model: default_model(),
            api_base_url: default_api_base_url(),
            request_delay_ms: default_request_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            use_profanity_filter: true,
            profanity_wordlist: None,
            text_field: default_text_field(),
            progress_every: default_progress_every(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_text_field() -> String {
    commentguard_core::dataset::COMMENT_TEXT.to_string()
}

fn default_progress_every() -> usize {
    10
}
