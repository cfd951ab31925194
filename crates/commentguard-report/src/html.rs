//! Standalone HTML report

use crate::summary::{display_id, ModerationReport};
use commentguard_core::Result;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; margin: 0; padding: 20px; color: #333; }
    .container { max-width: 1200px; margin: 0 auto; }
    h1 { color: #2c3e50; text-align: center; margin-bottom: 30px; }
    h2 { color: #3498db; margin-top: 30px; }
    .summary-box { background-color: #f8f9fa; border-radius: 5px; padding: 20px; margin-bottom: 30px; }
    .stats { display: flex; justify-content: space-around; flex-wrap: wrap; }
    .stat-card { background-color: white; border-radius: 5px; padding: 15px; margin: 10px; box-shadow: 0 2px 5px rgba(0,0,0,0.1); min-width: 200px; text-align: center; }
    .stat-card h3 { margin-top: 0; color: #2c3e50; }
    .stat-card .number { font-size: 24px; font-weight: bold; color: #3498db; }
    table { width: 100%; border-collapse: collapse; margin: 20px 0; }
    th, td { padding: 12px 15px; border-bottom: 1px solid #ddd; text-align: left; }
    th { background-color: #3498db; color: white; }
    tr:hover { background-color: #f5f5f5; }
    .offense-type { display: inline-block; padding: 5px 10px; border-radius: 20px; font-size: 12px; font-weight: bold; color: white; background-color: #7f8c8d; }
    .hate_speech { background-color: #e74c3c; }
    .harassment { background-color: #9b59b6; }
    .profanity { background-color: #e67e22; }
    .threat { background-color: #c0392b; }
    .misinformation { background-color: #f39c12; }
    .toxicity { background-color: #d35400; }
    .footer { margin-top: 50px; text-align: center; font-size: 14px; color: #7f8c8d; }
"#;

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl ModerationReport {
    /// Render the report as a self-contained HTML page
    pub fn render_html(&self) -> String {
        let mut html = String::new();

        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Comment Moderation Report</title>
  <style>{STYLE}</style>
</head>
<body>
<div class="container">
  <h1>Comment Moderation Report</h1>
  <div class="summary-box">
    <h2>Summary Statistics</h2>
    <div class="stats">
      <div class="stat-card"><h3>Total Comments</h3><div class="number">{total}</div></div>
      <div class="stat-card"><h3>Offensive Comments</h3><div class="number">{offensive} ({percentage}%)</div></div>
      <div class="stat-card"><h3>Pre-Filtered</h3><div class="number">{pre_filtered}</div></div>
    </div>
  </div>
"#,
            total = self.total_comments,
            offensive = self.offensive_comments,
            percentage = self.offensive_percentage,
            pre_filtered = self.pre_filtered_count,
        );

        html.push_str(
            "  <h2>Offense Type Breakdown</h2>\n  <table>\n    <tr><th>Offense Type</th><th>Count</th><th>Percentage</th></tr>\n",
        );
        for entry in &self.offense_type_breakdown {
            let label = escape_html(&entry.offense_type);
            let _ = writeln!(
                html,
                r#"    <tr><td><span class="offense-type {label}">{label}</span></td><td>{}</td><td>{}%</td></tr>"#,
                entry.count,
                self.share_of_offensive(entry),
            );
        }
        html.push_str("  </table>\n");

        html.push_str(
            "  <h2>Top Offensive Comments</h2>\n  <table>\n    <tr><th>ID</th><th>Username</th><th>Comment</th><th>Offense Type</th><th>Explanation</th></tr>\n",
        );
        for comment in &self.top_offensive_comments {
            let label = escape_html(comment.offense_type.as_deref().unwrap_or("none"));
            let _ = writeln!(
                html,
                r#"    <tr><td>{}</td><td>{}</td><td>{}</td><td><span class="offense-type {label}">{label}</span></td><td>{}</td></tr>"#,
                escape_html(&display_id(&comment.comment_id)),
                escape_html(&comment.username),
                escape_html(&comment.comment_text),
                escape_html(&comment.explanation),
            );
        }
        html.push_str("  </table>\n");

        let _ = write!(
            html,
            r#"  <div class="footer"><p>Generated by CommentGuard on {}</p></div>
</div>
</body>
</html>
"#,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );

        html
    }
}

/// Write the HTML report to `path`, creating its parent directory
pub fn write_html(report: &ModerationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, report.render_html())?;
    info!(path = %path.display(), "HTML report written");
    Ok(())
}
