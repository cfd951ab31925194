//! CommentGuard Report
//!
//! Reporting over a moderated comment dataset.
//!
//! Provides:
//! - Summary statistics: offensive share, category breakdown, most severe comments
//! - A plain-text console report
//! - A standalone HTML report

pub mod html;
pub mod summary;

pub use html::{escape_html, write_html};
pub use summary::{ModerationReport, OffenseCount, TopComment, TOP_COMMENT_LIMIT};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::summary::ModerationReport;
}
