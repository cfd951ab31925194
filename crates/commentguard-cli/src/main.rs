//! CommentGuard
//!
//! Classifies every comment in a CSV or JSON file as offensive or not,
//! writes the annotated file back out, and prints a moderation report.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

/// Exit status after an interrupted run
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "commentguard")]
#[command(about = "Analyzes comments for offensive content", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify the comments in INPUT and report on them
    Moderate(ModerateArgs),
    /// Show a summary and the first comments of INPUT without classifying
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct ModerateArgs {
    /// Comment file (.csv or .json)
    input: PathBuf,

    /// Output file (default: <input stem>_moderated.<ext> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Skip the profanity pre-filter
    #[arg(long)]
    no_profanity_filter: bool,

    /// Classify with the keyword heuristic only, without API calls
    #[arg(long)]
    heuristic: bool,

    /// Also write an HTML report next to the output file
    #[arg(long)]
    html: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "commentguard.yaml")]
    config: PathBuf,

    /// Log progress every N comments
    #[arg(long)]
    progress_every: Option<usize>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Comment file (.csv or .json)
    input: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // .env must be loaded before clap reads GEMINI_API_KEY
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Moderate(args) => {
            let config = config::load(&args.config, &args)?;
            match commands::moderate(&args, config).await? {
                commands::Outcome::Completed => Ok(ExitCode::SUCCESS),
                commands::Outcome::Cancelled => Ok(ExitCode::from(EXIT_CANCELLED)),
            }
        }
        Command::Preview(args) => {
            commands::preview(&args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("commentguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("commentguard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
