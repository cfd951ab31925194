//! Moderation summary statistics

use chrono::{DateTime, Utc};
use commentguard_core::dataset::{
    self, COMMENT_ID, COMMENT_TEXT, EXPLANATION, IS_OFFENSIVE, OFFENSE_TYPE, PRE_FILTERED,
    USERNAME,
};
use commentguard_core::{severity_of_label, Dataset, Result, Row};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Most severe offensive comments kept in a report
pub const TOP_COMMENT_LIMIT: usize = 5;

/// Columns a dataset must carry to be reported on
pub const REPORT_COLUMNS: [&str; 6] = [
    COMMENT_ID,
    USERNAME,
    COMMENT_TEXT,
    IS_OFFENSIVE,
    OFFENSE_TYPE,
    EXPLANATION,
];

/// Number of offensive comments in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffenseCount {
    pub offense_type: String,
    pub count: usize,
}

/// An offensive comment listed in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopComment {
    pub comment_id: Value,
    pub username: String,
    pub comment_text: String,
    pub offense_type: Option<String>,
    pub explanation: String,
}

/// Aggregate view of a moderated dataset
#[derive(Debug, Clone, Serialize)]
pub struct ModerationReport {
    pub total_comments: usize,
    pub offensive_comments: usize,
    /// Share of offensive comments, rounded to two decimals
    pub offensive_percentage: f64,
    /// Ordered by count, most frequent first
    pub offense_type_breakdown: Vec<OffenseCount>,
    pub top_offensive_comments: Vec<TopComment>,
    pub pre_filtered_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl ModerationReport {
    /// Build a report from a moderated dataset
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        dataset.require_columns(&REPORT_COLUMNS)?;

        let offensive: Vec<&Row> = dataset
            .rows()
            .iter()
            .filter(|row| row.get(IS_OFFENSIVE).is_some_and(dataset::flag_of))
            .collect();

        let total_comments = dataset.len();
        let offensive_comments = offensive.len();
        let offensive_percentage = if total_comments == 0 {
            0.0
        } else {
            round2(offensive_comments as f64 / total_comments as f64 * 100.0)
        };

        let pre_filtered_count = dataset
            .rows()
            .iter()
            .filter(|row| row.get(PRE_FILTERED).is_some_and(dataset::flag_of))
            .count();

        Ok(Self {
            total_comments,
            offensive_comments,
            offensive_percentage,
            offense_type_breakdown: breakdown(&offensive),
            top_offensive_comments: top_comments(&offensive),
            pre_filtered_count,
            generated_at: Utc::now(),
        })
    }

    /// Share of offensive comments falling in `entry`'s category, one decimal
    pub fn share_of_offensive(&self, entry: &OffenseCount) -> f64 {
        if self.offensive_comments == 0 {
            0.0
        } else {
            (entry.count as f64 / self.offensive_comments as f64 * 1000.0).round() / 10.0
        }
    }

    /// Console summary
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(out, "{:^60}", "COMMENT MODERATION SUMMARY REPORT");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "\nTOTAL COMMENTS: {}", self.total_comments);
        let _ = writeln!(
            out,
            "OFFENSIVE COMMENTS: {} ({}%)",
            self.offensive_comments, self.offensive_percentage
        );
        if self.pre_filtered_count > 0 {
            let _ = writeln!(
                out,
                "PRE-FILTERED BY PROFANITY DETECTOR: {}",
                self.pre_filtered_count
            );
        }

        let _ = writeln!(out, "\nOFFENSE TYPE BREAKDOWN:");
        for entry in &self.offense_type_breakdown {
            let _ = writeln!(out, "  - {}: {} comments", entry.offense_type, entry.count);
        }

        let _ = writeln!(out, "\nTOP OFFENSIVE COMMENTS:");
        for (i, comment) in self.top_offensive_comments.iter().enumerate() {
            let _ = writeln!(
                out,
                "\n  {}. [ID: {}] by {}",
                i + 1,
                display_id(&comment.comment_id),
                comment.username
            );
            let _ = writeln!(out, "     \"{}\"", comment.comment_text);
            let _ = writeln!(
                out,
                "     Type: {} | {}",
                comment.offense_type.as_deref().unwrap_or("none"),
                comment.explanation
            );
        }

        let _ = writeln!(out, "\n{rule}");
        out
    }
}

/// Comment id as shown to a reader: strings without quotes
pub(crate) fn display_id(id: &Value) -> String {
    dataset::text_of(id).unwrap_or_default()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn breakdown(offensive: &[&Row]) -> Vec<OffenseCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in offensive {
        if let Some(label) = row.get(OFFENSE_TYPE).and_then(Value::as_str) {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut entries: Vec<OffenseCount> = counts
        .into_iter()
        .map(|(label, count)| OffenseCount {
            offense_type: label.to_string(),
            count,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| {
                severity_of_label(Some(&b.offense_type))
                    .cmp(&severity_of_label(Some(&a.offense_type)))
            })
            .then_with(|| a.offense_type.cmp(&b.offense_type))
    });
    entries
}

fn top_comments(offensive: &[&Row]) -> Vec<TopComment> {
    let mut ranked: Vec<&Row> = offensive.to_vec();
    // stable: equal severity keeps dataset order
    ranked.sort_by_key(|row| {
        std::cmp::Reverse(severity_of_label(
            row.get(OFFENSE_TYPE).and_then(Value::as_str),
        ))
    });

    ranked
        .into_iter()
        .take(TOP_COMMENT_LIMIT)
        .map(|row| TopComment {
            comment_id: row.get(COMMENT_ID).cloned().unwrap_or(Value::Null),
            username: cell_text(row, USERNAME),
            comment_text: cell_text(row, COMMENT_TEXT),
            offense_type: row
                .get(OFFENSE_TYPE)
                .and_then(Value::as_str)
                .map(str::to_string),
            explanation: cell_text(row, EXPLANATION),
        })
        .collect()
}

fn cell_text(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(dataset::text_of)
        .unwrap_or_default()
}
