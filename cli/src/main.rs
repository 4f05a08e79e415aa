//! CLI for the issue migrator.
//!
//! Replays a Bitbucket issue export into a GitHub repository.

use clap::Parser;
use issue_migrator::{RunStatistics, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

/// Issue Migrator - Import Bitbucket issues and comments into GitHub.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with the Bitbucket export.
    file: PathBuf,

    /// GitHub repository to import into, as owner/name.
    #[arg(short, long)]
    repo: String,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Path to the TOML file with the assignee table and text formats.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not carry assignees over.
    #[arg(long)]
    no_assignees: bool,

    /// Title of the last issue imported by an interrupted run.
    #[arg(long, default_value = "")]
    resume_after: String,

    /// Preview the import without calling GitHub.
    #[arg(long)]
    dry_run: bool,

    /// Seconds to wait before retrying a failed GitHub call.
    #[arg(long, default_value_t = 10)]
    retry_delay_secs: u64,

    /// Milliseconds to pause after each created comment.
    #[arg(long, default_value_t = 250)]
    pacing_ms: u64,

    /// Abort instead of retrying when GitHub denies permission.
    #[arg(long)]
    fail_fast_on_permission: bool,

    /// GitHub API base URL, for GitHub Enterprise.
    #[arg(long)]
    api_base: Option<Url>,

    /// Print the final statistics as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();
    let json = args.json;

    match run(args).await {
        Ok(stats) => {
            print_summary(&stats, json);
            if stats.dry_run || stats.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!(error = %e, "Migration aborted");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunStatistics, RunnerError> {
    let config = RunnerConfig::new(args.file, args.repo, args.token)
        .with_config_path(args.config)
        .with_consider_assignees(!args.no_assignees)
        .with_resume_after(Some(args.resume_after))
        .with_dry_run(args.dry_run)
        .with_retry_delay(Duration::from_secs(args.retry_delay_secs))
        .with_pacing(Duration::from_millis(args.pacing_ms))
        .with_fail_fast_on_permission(args.fail_fast_on_permission)
        .with_api_base(args.api_base);

    Runner::new(config).run().await
}

/// Prints the final run statistics.
fn print_summary(stats: &RunStatistics, json: bool) {
    if json {
        match serde_json::to_string_pretty(stats) {
            Ok(text) => println!("{text}"),
            Err(e) => error!(error = %e, "Failed to serialize statistics"),
        }
        return;
    }

    println!("\nImport overview");
    println!("===============");
    println!("  Mode: {}", if stats.dry_run { "Dry Run" } else { "Live" });
    println!("Issues:");
    println!("    read: {}", stats.issues_read);
    println!("    imported: {}", stats.issues_imported);
    if stats.issues_resumed_past > 0 {
        println!("    resumed past: {}", stats.issues_resumed_past);
    }
    println!("Comments:");
    println!("    read: {}", stats.comments_read);
    println!("    imported: {}", stats.comments_imported);
    println!("    skipped (empty): {}", stats.comments_skipped);
    println!("Retries: {}", stats.retries);
}
