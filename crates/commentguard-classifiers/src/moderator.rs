//! Content moderator: pre-filter, then the configured classifier variant,
//! with the heuristic as the per-comment fallback target.
//!
//! One comment moves through these states:
//!
//! ```text
//! START ─┬─ profanity hit ───────────────────────────▸ PRE_FILTERED
//!        ├─ heuristic variant ───────────────────────▸ HEURISTIC
//!        └─ remote variant ─▸ REMOTE_ATTEMPTED ─┬────▸ REMOTE
//!                                               └─ err ▸ HEURISTIC_FALLBACK
//! ```

use crate::classifier::CommentClassifier;
use crate::config::{ModerationMode, ModeratorConfig};
use crate::generator::{GeminiClient, GeminiSettings, TextGenerator};
use crate::heuristic::HeuristicClassifier;
use crate::prefilter::ProfanityFilter;
use crate::remote::RemoteClassifier;
use commentguard_core::{Error, OffenseType, Result, Verdict};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Explanation attached to pre-filtered verdicts
pub const PREFILTER_EXPLANATION: &str =
    "Comment contains explicit profanity based on keyword matching";

/// Classifier variant selected at construction
pub enum ClassifierMode {
    /// Remote model with heuristic fallback
    Remote(RemoteClassifier),
    /// Heuristic only
    Heuristic,
}

/// Terminal state a comment reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionPath {
    /// The profanity list settled it; nothing else ran
    PreFiltered,
    /// Heuristic variant
    Heuristic,
    /// Remote reply parsed successfully
    Remote,
    /// Remote call or parse failed and the heuristic answered instead
    HeuristicFallback { reason: String },
}

impl DecisionPath {
    /// Short label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreFiltered => "pre_filtered",
            Self::Heuristic => "heuristic",
            Self::Remote => "remote",
            Self::HeuristicFallback { .. } => "heuristic_fallback",
        }
    }

    /// Fallback diagnostic, if the remote attempt failed
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Self::HeuristicFallback { reason } => Some(reason.as_str()),
            _ => None,
        }
    }
}

/// Verdict plus the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub path: DecisionPath,
}

/// Classifies single comments. Never fails once constructed.
pub struct ContentModerator {
    prefilter: Option<ProfanityFilter>,
    mode: ClassifierMode,
    heuristic: HeuristicClassifier,
}

impl ContentModerator {
    /// Create a moderator from its parts
    pub fn new(mode: ClassifierMode, prefilter: Option<ProfanityFilter>) -> Self {
        Self {
            prefilter,
            mode,
            heuristic: HeuristicClassifier::new(),
        }
    }

    /// Heuristic-only moderator
    pub fn offline(prefilter: Option<ProfanityFilter>) -> Self {
        Self::new(ClassifierMode::Heuristic, prefilter)
    }

    /// Remote moderator over any text generator
    pub fn remote(remote: RemoteClassifier, prefilter: Option<ProfanityFilter>) -> Self {
        Self::new(ClassifierMode::Remote(remote), prefilter)
    }

    /// Build a moderator from configuration.
    ///
    /// Remote mode without an API key and an unreadable extra word list are
    /// both fatal here, before any comment is seen.
    pub fn from_config(config: &ModeratorConfig) -> Result<Self> {
        let prefilter = if config.use_profanity_filter {
            let filter = match &config.profanity_wordlist {
                Some(path) => ProfanityFilter::with_extra_wordlist(path)?,
                None => ProfanityFilter::new()?,
            };
            Some(filter)
        } else {
            None
        };

        let moderator = match config.mode {
            ModerationMode::Heuristic => Self::offline(prefilter),
            ModerationMode::Remote => {
                let api_key = config
                    .api_key
                    .as_deref()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        Error::config(
                            "Gemini API key not provided. Set GEMINI_API_KEY in .env file or pass directly.",
                        )
                    })?;

                let settings = GeminiSettings {
                    api_key: api_key.to_string(),
                    model: config.model.clone(),
                    base_url: config.api_base_url.clone(),
                    timeout: config.request_timeout(),
                };
                let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(settings)?);
                let remote = RemoteClassifier::new(generator).with_request_delay(config.request_delay());
                Self::remote(remote, prefilter)
            }
        };

        info!(
            mode = moderator.mode_name(),
            profanity_filter = moderator.prefilter.is_some(),
            "Content moderator initialized"
        );
        Ok(moderator)
    }

    /// Whether comments are answered without any network call
    pub fn is_offline(&self) -> bool {
        matches!(self.mode, ClassifierMode::Heuristic)
    }

    /// Name of the classifier variant
    pub fn mode_name(&self) -> &str {
        match &self.mode {
            ClassifierMode::Remote(remote) => remote.name(),
            ClassifierMode::Heuristic => self.heuristic.name(),
        }
    }

    /// Whether the profanity pre-filter is active
    pub fn uses_prefilter(&self) -> bool {
        self.prefilter.is_some()
    }

    /// Classify one comment
    pub async fn classify(&self, text: &str) -> Classification {
        let classification = self.decide(text).await;

        metrics::counter!(
            "commentguard_classifications_total",
            "path" => classification.path.label()
        )
        .increment(1);

        classification
    }

    async fn decide(&self, text: &str) -> Classification {
        if let Some(filter) = &self.prefilter {
            if filter.contains_profanity(text) {
                debug!("Pre-filter matched known profanity");
                return Classification {
                    verdict: Verdict::offensive(OffenseType::Profanity, PREFILTER_EXPLANATION)
                        .pre_filtered(),
                    path: DecisionPath::PreFiltered,
                };
            }
        }

        let remote = match &self.mode {
            ClassifierMode::Heuristic => {
                return Classification {
                    verdict: self.heuristic.evaluate(text),
                    path: DecisionPath::Heuristic,
                };
            }
            ClassifierMode::Remote(remote) => remote,
        };

        match remote.classify(text).await {
            Ok(verdict) => Classification {
                verdict: Verdict {
                    pre_filtered: false,
                    mock_mode: false,
                    ..verdict
                },
                path: DecisionPath::Remote,
            },
            Err(e) => {
                let stage = if matches!(e, Error::Parse(_)) {
                    "parse"
                } else {
                    "call"
                };
                metrics::counter!("commentguard_remote_failures_total", "stage" => stage)
                    .increment(1);
                warn!(error = %e, stage, "Remote classification failed, falling back to heuristic");

                Classification {
                    verdict: self.heuristic.evaluate(text),
                    path: DecisionPath::HeuristicFallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}
