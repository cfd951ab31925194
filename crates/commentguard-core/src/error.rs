//! Error types for CommentGuard

/// Result type alias using CommentGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for CommentGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors (fatal before any row is processed)
    #[error("configuration error: {0}")]
    Config(String),

    /// Profanity word list could not be loaded
    #[error("pre-filter error: {0}")]
    Prefilter(String),

    /// Remote text generation failed (network, auth, quota, timeout)
    #[error("remote call failed: {0}")]
    Remote(String),

    /// A remote reply could not be turned into a verdict
    #[error("response parse error: {0}")]
    Parse(String),

    /// Dataset shape or content errors
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Input file extension is neither CSV nor JSON
    #[error("unsupported file format: {0}. Use CSV or JSON")]
    UnsupportedFormat(String),

    /// The batch run was interrupted between rows
    #[error("operation cancelled after {processed} comments")]
    Cancelled { processed: usize },

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV read/write errors
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new pre-filter error
    pub fn prefilter(msg: impl Into<String>) -> Self {
        Self::Prefilter(msg.into())
    }

    /// Create a new remote call error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create a new response parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Whether this error is a user-triggered cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
