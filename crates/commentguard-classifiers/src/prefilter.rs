//! Profanity pre-filter
//!
//! A fast local word-list check run before any other classification. A hit
//! settles the verdict on its own.

use aho_corasick::{AhoCorasick, MatchKind};
use commentguard_core::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Word list compiled into the binary
const DEFAULT_WORDLIST: &str = include_str!("../data/profanity_wordlist.txt");

/// Known-profanity matcher built once from a word list.
///
/// Matching is ASCII case-insensitive and only counts whole words, so
/// "class" does not trip on a listed "ass".
pub struct ProfanityFilter {
    matcher: AhoCorasick,
    word_count: usize,
}

impl ProfanityFilter {
    /// Build the filter from the bundled word list
    pub fn new() -> Result<Self> {
        Self::from_words(parse_wordlist(DEFAULT_WORDLIST))
    }

    /// Build the filter from an explicit word list
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return Err(Error::prefilter("profanity word list is empty"));
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&words)
            .map_err(|e| Error::prefilter(format!("Failed to build profanity matcher: {e}")))?;

        debug!(words = words.len(), "Profanity filter initialized");

        Ok(Self {
            matcher,
            word_count: words.len(),
        })
    }

    /// Build the filter from the bundled list plus the words in `path`
    pub fn with_extra_wordlist(path: &Path) -> Result<Self> {
        let extra = std::fs::read_to_string(path).map_err(|e| {
            Error::prefilter(format!(
                "Failed to read profanity word list {}: {e}",
                path.display()
            ))
        })?;

        Self::from_words(parse_wordlist(DEFAULT_WORDLIST).chain(parse_wordlist(&extra)))
    }

    /// Number of words in the list
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Whether `text` contains a listed word
    pub fn contains_profanity(&self, text: &str) -> bool {
        self.matcher
            .find_overlapping_iter(text)
            .any(|m| is_word_boundary(text, m.start(), m.end()))
    }
}

fn parse_wordlist(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
