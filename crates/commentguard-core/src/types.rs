//! Core types for CommentGuard

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Offense category assigned to an offensive comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffenseType {
    /// Attacks on specific groups
    HateSpeech,
    /// Attacks targeting individuals
    Harassment,
    /// Explicit language
    Profanity,
    /// Violent intentions
    Threat,
    /// False claims
    Misinformation,
    /// Generally negative or harmful
    Toxicity,
}

impl OffenseType {
    /// All categories in their fixed enumeration order.
    ///
    /// This order is the tie-break whenever two categories compete with the
    /// same rank, and the scan order of the free-text reply parser.
    pub const ALL: [OffenseType; 6] = [
        Self::HateSpeech,
        Self::Harassment,
        Self::Profanity,
        Self::Threat,
        Self::Misinformation,
        Self::Toxicity,
    ];

    /// Wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HateSpeech => "hate_speech",
            Self::Harassment => "harassment",
            Self::Profanity => "profanity",
            Self::Threat => "threat",
            Self::Misinformation => "misinformation",
            Self::Toxicity => "toxicity",
        }
    }

    /// Severity rank, higher is more severe
    pub fn severity(&self) -> u8 {
        match self {
            Self::Threat => 6,
            Self::HateSpeech => 5,
            Self::Harassment => 4,
            Self::Profanity => 3,
            Self::Misinformation => 2,
            Self::Toxicity => 1,
        }
    }
}

impl fmt::Display for OffenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OffenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown offense type: {s}"))
    }
}

/// Severity of an optional category. `None` ranks 0.
pub fn severity(offense: Option<OffenseType>) -> u8 {
    offense.map(|t| t.severity()).unwrap_or(0)
}

/// Severity of a raw category label as stored in a dataset cell.
///
/// Unknown or absent labels rank 0.
pub fn severity_of_label(label: Option<&str>) -> u8 {
    severity(label.and_then(|l| l.parse().ok()))
}

/// Outcome of classifying a single comment.
///
/// These are exactly the five result fields written back to a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_offensive: bool,
    pub offense_type: Option<OffenseType>,
    pub explanation: String,
    pub pre_filtered: bool,
    pub mock_mode: bool,
}

impl Verdict {
    /// A non-offensive verdict with the given explanation
    pub fn clean(explanation: impl Into<String>) -> Self {
        Self {
            is_offensive: false,
            offense_type: None,
            explanation: explanation.into(),
            pre_filtered: false,
            mock_mode: false,
        }
    }

    /// An offensive verdict in the given category
    pub fn offensive(offense_type: OffenseType, explanation: impl Into<String>) -> Self {
        Self {
            is_offensive: true,
            offense_type: Some(offense_type),
            explanation: explanation.into(),
            pre_filtered: false,
            mock_mode: false,
        }
    }

    /// Mark the verdict as produced by the profanity pre-filter
    pub fn pre_filtered(mut self) -> Self {
        self.pre_filtered = true;
        self.mock_mode = false;
        self
    }

    /// Mark the verdict as produced by the heuristic classifier
    pub fn mocked(mut self) -> Self {
        self.mock_mode = true;
        self.pre_filtered = false;
        self
    }
}
