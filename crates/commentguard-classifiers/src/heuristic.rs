//! Keyword heuristic classifier
//!
//! Deterministic offline classifier driven by a fixed category → trigger
//! table. It runs when the moderator is built in heuristic mode and whenever
//! a remote classification fails.

use crate::classifier::CommentClassifier;
use commentguard_core::{OffenseType, Result, Verdict};

/// Explanation used when no rule fires
pub const NO_OFFENSE_EXPLANATION: &str = "No offensive content detected";

/// Fragment appended by the exclamation heuristic
pub const STRONG_SENTIMENT_EXPLANATION: &str = "Strong negative sentiment detected";

/// Trigger substrings for one offense category
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub offense_type: OffenseType,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new<I, S>(offense_type: OffenseType, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            offense_type,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Default trigger table, in category enumeration order
pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            OffenseType::HateSpeech,
            ["foreigners", "hate", "discriminatory", "racist", "country"],
        ),
        KeywordRule::new(
            OffenseType::Harassment,
            ["stupid", "idiots", "losers", "fat", "basement", "kill yourself", "sucks"],
        ),
        KeywordRule::new(OffenseType::Profanity, ["f***", "f**k", "shit", "damn"]),
        KeywordRule::new(OffenseType::Threat, ["shoot", "kill", "threat", "die"]),
        KeywordRule::new(
            OffenseType::Misinformation,
            ["secretly", "spying", "government", "sheeple", "wake up"],
        ),
        KeywordRule::new(
            OffenseType::Toxicity,
            ["annoying", "waste", "useless", "bankrupt", "violating"],
        ),
    ]
}

/// Words that, together with an exclamation mark, signal strong negativity
pub fn default_sentiment_terms() -> Vec<String> {
    ["hate", "stupid", "annoying", "violating"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Keyword-table classifier.
///
/// Every trigger found marks the comment offensive and adds an explanation
/// fragment. The category is the first one found in rule order, replaced
/// only by a strictly more severe one, so equal ranks keep the earlier rule
/// regardless of where the triggers sit in the text.
pub struct HeuristicClassifier {
    name: String,
    rules: Vec<KeywordRule>,
    sentiment_terms: Vec<String>,
}

impl HeuristicClassifier {
    /// Create a heuristic classifier with the default tables
    pub fn new() -> Self {
        Self::with_rules(default_rules(), default_sentiment_terms())
    }

    /// Create a heuristic classifier with custom tables. Rules are scanned
    /// in the order given.
    pub fn with_rules(rules: Vec<KeywordRule>, sentiment_terms: Vec<String>) -> Self {
        let lower = |s: String| s.to_lowercase();
        Self {
            name: "heuristic".to_string(),
            rules: rules
                .into_iter()
                .map(|rule| KeywordRule {
                    offense_type: rule.offense_type,
                    keywords: rule.keywords.into_iter().map(lower).collect(),
                })
                .collect(),
            sentiment_terms: sentiment_terms.into_iter().map(lower).collect(),
        }
    }

    /// Classify `text` against the tables. Always tagged `mock_mode`.
    pub fn evaluate(&self, text: &str) -> Verdict {
        let text_lower = text.to_lowercase();

        let mut is_offensive = false;
        let mut offense_type: Option<OffenseType> = None;
        let mut fragments: Vec<String> = Vec::new();

        for rule in &self.rules {
            for keyword in &rule.keywords {
                if !text_lower.contains(keyword.as_str()) {
                    continue;
                }
                is_offensive = true;
                match offense_type {
                    None => offense_type = Some(rule.offense_type),
                    Some(current) if rule.offense_type.severity() > current.severity() => {
                        offense_type = Some(rule.offense_type)
                    }
                    Some(_) => {}
                }
                fragments.push(format!(
                    "Contains potentially {} term '{}'",
                    rule.offense_type, keyword
                ));
            }
        }

        if text.contains('!')
            && self
                .sentiment_terms
                .iter()
                .any(|term| text_lower.contains(term.as_str()))
        {
            is_offensive = true;
            offense_type.get_or_insert(OffenseType::Toxicity);
            fragments.push(STRONG_SENTIMENT_EXPLANATION.to_string());
        }

        let verdict = match (is_offensive, offense_type) {
            (true, Some(offense)) => Verdict::offensive(offense, fragments.join("; ")),
            _ => Verdict::clean(NO_OFFENSE_EXPLANATION),
        };
        verdict.mocked()
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CommentClassifier for HeuristicClassifier {
    async fn classify(&self, text: &str) -> Result<Verdict> {
        Ok(self.evaluate(text))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
