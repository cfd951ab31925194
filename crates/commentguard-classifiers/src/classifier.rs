//! Classifier trait shared by the heuristic and remote classifiers

use async_trait::async_trait;
use commentguard_core::{Result, Verdict};

/// Trait for single-comment classifiers
#[async_trait]
pub trait CommentClassifier: Send + Sync {
    /// Classify one comment
    async fn classify(&self, text: &str) -> Result<Verdict>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
