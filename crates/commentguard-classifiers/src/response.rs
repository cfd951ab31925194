//! Remote reply parsing
//!
//! Replies are parsed in two tiers:
//!
//! 1. **Structured**: when the reply contains `{` and `}`, the text between
//!    the first `{` and the last `}` must be a JSON object with
//!    `is_offensive` (bool), `offense_type` (category name or null) and
//!    `explanation` (string). Anything else is a parse error.
//! 2. **Free text**: otherwise the reply is read loosely. The token "yes"
//!    anywhere (case-insensitive) means offensive, the first category of the
//!    fixed enumeration that appears names the offense, and the text after
//!    the last literal `explanation` (and a following colon) becomes the
//!    explanation, cut to 100 characters. This tier is best-effort and never
//!    fails.
//!
//! Both tiers normalise the verdict so that an offensive verdict always has a
//! category (`toxicity` when none was given) and a clean one never does, and
//! both substitute [`MISSING_EXPLANATION`] for an empty explanation. A
//! classified row always carries a non-empty explanation.

use commentguard_core::{Error, OffenseType, Result, Verdict};
use serde::Deserialize;

/// Longest explanation kept from a free-text reply, in characters
pub const MAX_FREE_TEXT_EXPLANATION: usize = 100;

/// Explanation used when a reply omits one
pub const MISSING_EXPLANATION: &str = "No explanation provided";

/// Which tier produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Structured,
    FreeText,
}

#[derive(Debug, Deserialize)]
struct StructuredReply {
    is_offensive: bool,
    #[serde(default)]
    offense_type: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse a remote reply into a verdict tagged for the remote path
pub fn parse_reply(reply: &str) -> Result<(Verdict, ReplyFormat)> {
    if reply.contains('{') && reply.contains('}') {
        parse_structured(reply).map(|v| (v, ReplyFormat::Structured))
    } else {
        Ok((parse_free_text(reply), ReplyFormat::FreeText))
    }
}

/// Structured tier
pub fn parse_structured(reply: &str) -> Result<Verdict> {
    let (start, end) = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(Error::parse("reply has no JSON object")),
    };

    let raw: StructuredReply = serde_json::from_str(&reply[start..=end])
        .map_err(|e| Error::parse(format!("malformed JSON reply: {e}")))?;

    let offense_type = match raw.offense_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(label) if label.eq_ignore_ascii_case("null") || label.eq_ignore_ascii_case("none") => {
            None
        }
        Some(label) => Some(
            label
                .to_lowercase()
                .parse::<OffenseType>()
                .map_err(Error::parse)?,
        ),
    };

    let explanation = raw
        .explanation
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| MISSING_EXPLANATION.to_string());

    Ok(normalize(raw.is_offensive, offense_type, explanation))
}

/// Free-text tier
pub fn parse_free_text(reply: &str) -> Verdict {
    let lower = reply.to_lowercase();
    let is_offensive = lower.contains("yes");

    let offense_type = if is_offensive {
        OffenseType::ALL
            .into_iter()
            .find(|t| lower.contains(t.as_str()))
    } else {
        None
    };

    let mut explanation = reply.rsplit("explanation").next().unwrap_or(reply).trim();
    if let Some((_, rest)) = explanation.split_once(':') {
        explanation = rest.trim();
    }
    let explanation: String = if explanation.is_empty() {
        MISSING_EXPLANATION.to_string()
    } else {
        explanation.chars().take(MAX_FREE_TEXT_EXPLANATION).collect()
    };

    normalize(is_offensive, offense_type, explanation)
}

fn normalize(is_offensive: bool, offense_type: Option<OffenseType>, explanation: String) -> Verdict {
    if is_offensive {
        Verdict::offensive(offense_type.unwrap_or(OffenseType::Toxicity), explanation)
    } else {
        Verdict::clean(explanation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_reply() {
        let (verdict, format) = parse_reply(
            r#"{"is_offensive": true, "offense_type": "threat", "explanation": "Threatens violence"}"#,
        )
        .unwrap();

        assert_eq!(format, ReplyFormat::Structured);
        assert_eq!(verdict, Verdict::offensive(OffenseType::Threat, "Threatens violence"));
        assert!(!verdict.mock_mode);
        assert!(!verdict.pre_filtered);
    }

    #[test]
    fn test_structured_reply_inside_code_fence() {
        let reply = "```json\n{\"is_offensive\": false, \"offense_type\": null, \"explanation\": \"Polite\"}\n```";
        let (verdict, _) = parse_reply(reply).unwrap();
        assert_eq!(verdict, Verdict::clean("Polite"));
    }

    #[test]
    fn test_structured_clean_reply_drops_category() {
        let verdict = parse_structured(
            r#"{"is_offensive": false, "offense_type": "toxicity", "explanation": "fine"}"#,
        )
        .unwrap();
        assert_eq!(verdict.offense_type, None);
    }

    #[test]
    fn test_structured_offensive_without_category_defaults_to_toxicity() {
        let verdict = parse_structured(r#"{"is_offensive": true, "offense_type": null}"#).unwrap();
        assert_eq!(verdict.offense_type, Some(OffenseType::Toxicity));
        assert_eq!(verdict.explanation, MISSING_EXPLANATION);
    }

    #[test]
    fn test_structured_unknown_category_is_parse_error() {
        let err = parse_reply(r#"{"is_offensive": true, "offense_type": "spam", "explanation": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_malformed_braces_are_parse_error() {
        assert!(matches!(parse_reply("} oops {"), Err(Error::Parse(_))));
        assert!(matches!(parse_reply("{is_offensive: yes}"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_free_text_reply() {
        let reply = "Offensive: Yes\nType: harassment\nExplanation: Insults the reader directly.";
        let (verdict, format) = parse_reply(reply).unwrap();

        assert_eq!(format, ReplyFormat::FreeText);
        assert!(verdict.is_offensive);
        assert_eq!(verdict.offense_type, Some(OffenseType::Harassment));
        // the literal token is lowercase, so "Explanation:" is not a split point
        assert_eq!(verdict.explanation, "Yes\nType: harassment\nExplanation: Insults the reader directly.");
    }

    #[test]
    fn test_free_text_splits_on_lowercase_token() {
        let verdict = parse_free_text("No. explanation: nothing hostile here");
        assert!(!verdict.is_offensive);
        assert_eq!(verdict.offense_type, None);
        assert_eq!(verdict.explanation, "nothing hostile here");
    }

    #[test]
    fn test_free_text_category_follows_enumeration_order() {
        // threat appears first in the text, harassment first in the enumeration
        let verdict = parse_free_text("yes - threat and harassment");
        assert_eq!(verdict.offense_type, Some(OffenseType::Harassment));
    }

    #[test]
    fn test_free_text_empty_explanation_is_replaced() {
        let verdict = parse_free_text("Yes, harassment. explanation:");
        assert!(verdict.is_offensive);
        assert_eq!(verdict.explanation, MISSING_EXPLANATION);

        let (verdict, _) = parse_reply("No explanation:   ").unwrap();
        assert_eq!(verdict.explanation, MISSING_EXPLANATION);
    }

    #[test]
    fn test_free_text_explanation_is_truncated() {
        let long = format!("yes explanation: {}", "a".repeat(300));
        let verdict = parse_free_text(&long);
        assert_eq!(verdict.explanation.chars().count(), MAX_FREE_TEXT_EXPLANATION);
    }
}
