//! Moderator configuration loading

use crate::ModerateArgs;
use anyhow::Context;
use commentguard_classifiers::{ModerationMode, ModeratorConfig};
use std::path::Path;
use tracing::debug;

/// Load configuration from file and CLI overrides.
///
/// A missing file means defaults. The API key comes from `-k` or
/// `GEMINI_API_KEY` when given, otherwise from the file.
pub fn load(config_path: &Path, args: &ModerateArgs) -> anyhow::Result<ModeratorConfig> {
    let mut config = if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        debug!(path = %config_path.display(), "Loaded configuration file");
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?
    } else {
        ModeratorConfig::default()
    };

    if args.heuristic {
        config.mode = ModerationMode::Heuristic;
    }

    if args.no_profanity_filter {
        config.use_profanity_filter = false;
    }

    if let Some(key) = &args.api_key {
        config.api_key = Some(key.clone());
    }

    if let Some(every) = args.progress_every {
        config.progress_every = every;
    }

    Ok(config)
}
