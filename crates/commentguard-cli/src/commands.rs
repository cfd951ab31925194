//! Subcommand implementations

use crate::{ModerateArgs, PreviewArgs};
use anyhow::Context;
use commentguard_classifiers::{BatchModerator, ContentModerator, ModeratorConfig};
use commentguard_core::dataset::{self, COMMENT_ID, COMMENT_TEXT, USERNAME};
use commentguard_core::{default_output_path, CommentLoader, DatasetSummary, Row};
use commentguard_report::{write_html, ModerationReport};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Comments shown by `preview`
const PREVIEW_ROWS: usize = 5;

/// How a moderation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Interrupted; rows classified so far were saved
    Cancelled,
}

pub async fn moderate(args: &ModerateArgs, config: ModeratorConfig) -> anyhow::Result<Outcome> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    info!("Loading comments from {}", args.input.display());
    let loader = CommentLoader::new(&args.input)?;
    let mut comments = loader
        .load()
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let summary = DatasetSummary::from_dataset(&comments);
    println!(
        "Loaded {} comments from {} unique users.",
        summary.total_comments, summary.unique_users
    );
    println!(
        "Average comment length: {} characters.",
        summary.avg_comment_length
    );

    let moderator = ContentModerator::from_config(&config)?;
    if moderator.is_offline() {
        println!("Running in HEURISTIC MODE - no API calls will be made.");
    }
    let batch = BatchModerator::new(moderator).with_progress_every(config.progress_every);

    println!("Analyzing comments for offensive content. Press Ctrl+C to stop.");
    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if watch_interrupts(tokio::signal::ctrl_c, cancel).await {
                warn!("Second interrupt received, exiting without saving");
                std::process::exit(i32::from(crate::EXIT_CANCELLED));
            }
        }
    });
    let result = batch
        .classify_all(&mut comments, &config.text_field, &cancel)
        .await;
    interrupt.abort();

    match result {
        Ok(run) => {
            info!(
                classified = run.classified,
                skipped = run.skipped,
                pre_filtered = run.pre_filtered,
                fallbacks = run.fallbacks,
                "Moderation run finished"
            );
        }
        Err(e) if e.is_cancelled() => {
            let saved = loader.save(&comments, &output)?;
            println!("\nOperation cancelled by user.");
            println!(
                "Partial results saved to {}. Run again on that file to resume.",
                saved.display()
            );
            return Ok(Outcome::Cancelled);
        }
        Err(e) => return Err(e.into()),
    }

    println!("Saving moderation results to {}...", output.display());
    let saved = loader.save(&comments, &output)?;

    let report = ModerationReport::from_dataset(&comments)?;
    println!("{}", report.render_text());

    if args.html {
        let html_path = report_path(&saved);
        println!("Generating HTML report to {}...", html_path.display());
        write_html(&report, &html_path)?;
    }

    println!("Moderation complete!");
    Ok(Outcome::Completed)
}

pub fn preview(args: &PreviewArgs) -> anyhow::Result<()> {
    let comments = CommentLoader::new(&args.input)?
        .load()
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let summary = DatasetSummary::from_dataset(&comments);

    println!("\n=== Comment File Summary ===");
    println!("File: {}", args.input.display());
    println!("Total comments: {}", summary.total_comments);
    println!("Unique users: {}", summary.unique_users);
    println!(
        "Average comment length: {} characters",
        summary.avg_comment_length
    );

    println!("\n=== Comment Preview ===");
    for (i, row) in comments.rows().iter().take(PREVIEW_ROWS).enumerate() {
        println!(
            "{}. [ID: {}] {}: {}",
            i + 1,
            cell(row, COMMENT_ID),
            cell(row, USERNAME),
            cell(row, COMMENT_TEXT)
        );
    }

    println!(
        "\nShowing {} of {} comments.",
        comments.len().min(PREVIEW_ROWS),
        summary.total_comments
    );
    Ok(())
}

/// Cancel `cancel` on the first interrupt; return true on the second.
///
/// Returns false if the interrupt handler cannot be installed.
async fn watch_interrupts<F, Fut>(mut interrupt: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = interrupt().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        return false;
    }
    warn!("Interrupt received, stopping after the current comment. Press Ctrl+C again to exit now");
    cancel.cancel();

    interrupt().await.is_ok()
}

/// `<dir>/<stem>_report.html` next to the saved output
fn report_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}_report.html"))
}

fn cell(row: &Row, column: &str) -> String {
    row.get(column)
        .and_then(dataset::text_of)
        .unwrap_or_default()
}
