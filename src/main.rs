//! pipfile-diff: dependency diff summaries for Pipfile.lock changes
//!
//! Compares two lockfile snapshots and reports added, removed, and changed
//! dependencies, either locally or as a pull-request comment.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use pipfile_diff::{cli, pipeline::exit_codes, DiffOptions, ReportFormat};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported lockfile formats:",
        "\n  Pipfile.lock (pipfile-spec 6)",
        "\n\nOutput formats:",
        "\n  summary, markdown"
    )
}

#[derive(Parser)]
#[command(name = "pipfile-diff")]
#[command(version, long_version = build_long_version())]
#[command(about = "Pipfile.lock dependency diff summaries for pull requests", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success (no changes, or changes without --fail-on-change)
    1  Changes detected (with --fail-on-change)
    2  Error occurred

EXAMPLES:
    # Compare two local lockfiles
    pipfile-diff diff base/Pipfile.lock head/Pipfile.lock

    # CI gate: fail the job when dependencies changed
    pipfile-diff diff base/Pipfile.lock head/Pipfile.lock --fail-on-change

    # Inside a pull-request CI job (refs and token from the event)
    pipfile-diff comment

    # Preview the comment body without posting it
    pipfile-diff comment --dry-run")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the base/old lockfile
    base: PathBuf,

    /// Path to the head/new lockfile
    head: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "summary")]
    output: ReportFormat,

    /// Treat a re-resolved commit as a change even when the ref is identical
    #[arg(long)]
    strict_vcs_commit: bool,

    /// Exit with code 1 if any changes are detected
    #[arg(long)]
    fail_on_change: bool,
}

/// Arguments for the `comment` subcommand
#[cfg(feature = "publish")]
#[derive(Parser)]
struct CommentArgs {
    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Pull request number (read from the event payload when omitted)
    #[arg(long)]
    pr: Option<u64>,

    /// Base commit reference
    #[arg(long, env = "INPUT_BASE-SHA")]
    base_sha: String,

    /// Head commit reference
    #[arg(long, env = "INPUT_HEAD-SHA")]
    head_sha: String,

    /// Access token for the hosting API
    #[arg(long, env = "INPUT_REPO-TOKEN", hide_env_values = true)]
    token: String,

    /// Lockfile path within the repository
    #[arg(long, default_value = "Pipfile.lock")]
    lockfile: String,

    /// Treat a re-resolved commit as a change even when the ref is identical
    #[arg(long)]
    strict_vcs_commit: bool,

    /// Render and print the comment body without delivering it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two local lockfiles and print the diff
    Diff(DiffArgs),

    /// Fetch, diff, and comment on a pull request
    #[cfg(feature = "publish")]
    Comment(CommentArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Resolve the pull request number: explicit flag first, then the CI event
/// payload at `GITHUB_EVENT_PATH`.
#[cfg(feature = "publish")]
fn resolve_pr_number(explicit: Option<u64>) -> Result<u64> {
    if let Some(number) = explicit {
        return Ok(number);
    }
    let event_path = std::env::var("GITHUB_EVENT_PATH").map_err(|_| {
        anyhow::anyhow!("pull request number not given and GITHUB_EVENT_PATH is unset")
    })?;
    Ok(pipfile_diff::pr_number_from_event(std::path::Path::new(
        &event_path,
    ))?)
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let no_color = cli.no_color || std::env::var_os("NO_COLOR").is_some();

    match run(cli.command, no_color) {
        Ok(code) => {
            if code != exit_codes::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Dispatch to the command handlers.
fn run(command: Commands, no_color: bool) -> Result<i32> {
    let exit_code = match command {
        Commands::Diff(args) => {
            let config = pipfile_diff::DiffInvocation {
                base: args.base,
                head: args.head,
                format: args.output,
                options: DiffOptions {
                    strict_vcs_commit: args.strict_vcs_commit,
                },
                fail_on_change: args.fail_on_change,
                no_color,
            };
            cli::run_diff(&config)?
        }
        #[cfg(feature = "publish")]
        Commands::Comment(args) => {
            let config = pipfile_diff::CommentConfig {
                repository: args.repository,
                pr_number: resolve_pr_number(args.pr)?,
                base_ref: args.base_sha,
                head_ref: args.head_sha,
                token: args.token,
                lockfile_path: args.lockfile,
                options: DiffOptions {
                    strict_vcs_commit: args.strict_vcs_commit,
                },
                dry_run: args.dry_run,
            };
            cli::run_comment(&config)?
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            exit_codes::SUCCESS
        }
    };
    Ok(exit_code)
}
