//! CommentGuard Classifiers
//!
//! Comment classification pipeline for offensive-content moderation.
//!
//! A comment is checked in stages:
//! - Pre-filter: known-profanity word list, settles the verdict on a hit
//! - Classifier variant chosen at construction: a remote language model or
//!   the deterministic keyword heuristic
//! - Fallback: any remote failure is answered by the heuristic instead
//!
//! [`BatchModerator`] runs the moderator over a whole dataset, skipping rows
//! that were already classified so interrupted runs can resume.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod generator;
pub mod heuristic;
pub mod moderator;
pub mod prefilter;
pub mod remote;
pub mod response;

pub use batch::{BatchModerator, BatchSummary, LogProgress, Progress, ProgressObserver};
pub use classifier::CommentClassifier;
pub use config::{ModerationMode, ModeratorConfig};
pub use generator::{GeminiClient, GeminiSettings, TextGenerator};
pub use heuristic::{HeuristicClassifier, KeywordRule};
pub use moderator::{Classification, ClassifierMode, ContentModerator, DecisionPath};
pub use prefilter::ProfanityFilter;
pub use remote::RemoteClassifier;
pub use response::{parse_reply, ReplyFormat};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::batch::{BatchModerator, BatchSummary};
    pub use crate::classifier::CommentClassifier;
    pub use crate::config::{ModerationMode, ModeratorConfig};
    pub use crate::generator::TextGenerator;
    pub use crate::heuristic::HeuristicClassifier;
    pub use crate::moderator::{Classification, ContentModerator, DecisionPath};
    pub use crate::prefilter::ProfanityFilter;
    pub use crate::remote::RemoteClassifier;
}
