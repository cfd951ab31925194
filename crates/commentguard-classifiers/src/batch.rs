//! Batch moderation over a comment dataset
//!
//! The batch moderator holds the dataset by exclusive borrow for the whole
//! run. Rows are visited in order; rows that already carry an explanation
//! are skipped, which makes an interrupted run resumable. Each remaining row
//! is classified and replaced wholesale, so a row is either untouched or
//! carries all five result fields.

use crate::moderator::{ContentModerator, DecisionPath};
use commentguard_core::dataset::{self, Dataset};
use commentguard_core::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Progress notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the row just classified
    pub processed: usize,
    /// Rows in the dataset
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Receives progress notifications. Purely observational.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: Progress);
}

/// Logs progress through `tracing`
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, progress: Progress) {
        info!(
            "Processed {}/{} comments ({:.1}%)",
            progress.processed,
            progress.total,
            progress.percent()
        );
    }
}

/// Counts for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Rows in the dataset
    pub total: usize,
    /// Rows classified in this run
    pub classified: usize,
    /// Rows skipped because they were already classified
    pub skipped: usize,
    pub pre_filtered: usize,
    pub remote: usize,
    pub heuristic: usize,
    /// Remote attempts that fell back to the heuristic
    pub fallbacks: usize,
}

impl BatchSummary {
    fn record(&mut self, path: &DecisionPath) {
        self.classified += 1;
        match path {
            DecisionPath::PreFiltered => self.pre_filtered += 1,
            DecisionPath::Remote => self.remote += 1,
            DecisionPath::Heuristic => self.heuristic += 1,
            DecisionPath::HeuristicFallback { .. } => {
                self.heuristic += 1;
                self.fallbacks += 1;
            }
        }
    }
}

/// Applies a [`ContentModerator`] to every unclassified row of a dataset
pub struct BatchModerator {
    moderator: ContentModerator,
    progress_every: usize,
    observer: Arc<dyn ProgressObserver>,
}

impl BatchModerator {
    /// Create a batch moderator reporting every 10 rows through the log
    pub fn new(moderator: ContentModerator) -> Self {
        Self {
            moderator,
            progress_every: 10,
            observer: Arc::new(LogProgress),
        }
    }

    /// Progress cadence in rows. Zero disables notifications.
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    /// Replace the progress observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Classify every row of `dataset` that has no explanation yet.
    ///
    /// The five result columns are added with their defaults if missing.
    /// Cancellation is checked before each row; on cancellation the rows
    /// finished so far stay written and `Error::Cancelled` is returned.
    pub async fn classify_all(
        &self,
        dataset: &mut Dataset,
        text_field: &str,
        cancel: &CancellationToken,
    ) -> Result<BatchSummary> {
        if !dataset.has_column(text_field) {
            return Err(Error::dataset(format!(
                "Text column '{text_field}' not found in the data"
            )));
        }

        for (column, default) in dataset::result_column_defaults() {
            dataset.ensure_column(column, default);
        }

        let total = dataset.len();
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };

        if self.moderator.is_offline() {
            info!("Running in heuristic mode - keyword matching instead of the remote model");
        }
        let pending = dataset.rows().iter().filter(|r| !dataset::is_classified(r)).count();
        info!(total, pending, "Starting batch moderation");

        for index in 0..total {
            let Some(row) = dataset.row(index) else {
                break;
            };
            if dataset::is_classified(row) {
                summary.skipped += 1;
                continue;
            }

            if cancel.is_cancelled() {
                warn!(processed = summary.classified, "Batch moderation cancelled");
                return Err(Error::Cancelled {
                    processed: summary.classified,
                });
            }

            let text = row
                .get(text_field)
                .and_then(dataset::text_of)
                .unwrap_or_default();

            let classification = self.moderator.classify(&text).await;
            if let Some(reason) = classification.path.fallback_reason() {
                debug!(row = index, reason, "Row answered by heuristic fallback");
            }

            let updated = dataset::with_verdict(row, &classification.verdict);
            dataset.replace_row(index, updated)?;
            summary.record(&classification.path);

            let position = index + 1;
            if self.progress_every > 0 && position % self.progress_every == 0 {
                self.observer.on_progress(Progress {
                    processed: position,
                    total,
                });
            }
        }

        info!(
            classified = summary.classified,
            skipped = summary.skipped,
            fallbacks = summary.fallbacks,
            "Batch moderation complete"
        );
        Ok(summary)
    }
}
