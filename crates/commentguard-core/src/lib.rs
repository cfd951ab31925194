//! CommentGuard Core
//!
//! Core types, errors, and the dataset abstraction shared across CommentGuard
//! components.
//!
//! This crate provides:
//! - Offense categories and the severity ranking policy
//! - The per-comment verdict record
//! - The tabular dataset that the batch moderator annotates
//! - CSV/JSON comment file loading and saving

pub mod dataset;
pub mod error;
pub mod loader;
pub mod types;

pub use dataset::{Dataset, Row};
pub use error::{Error, Result};
pub use loader::{default_output_path, CommentLoader, DatasetSummary, FileFormat};
pub use types::{severity, severity_of_label, OffenseType, Verdict};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dataset::{Dataset, Row};
    pub use crate::error::{Error, Result};
    pub use crate::types::{severity, OffenseType, Verdict};
}
