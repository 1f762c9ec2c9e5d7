//! Configuration types for pipfile-diff operations.
//!
//! Typed per-command configuration structs built by `main.rs` from CLI
//! arguments (with env fallbacks supplied by the invoking CI event) and
//! consumed by the `cli` handlers.

use crate::diff::DiffOptions;
use crate::error::{PipfileDiffError, Result};
use crate::reports::ReportFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for the local `diff` command.
#[derive(Debug, Clone)]
pub struct DiffInvocation {
    /// Base-side lockfile path
    pub base: PathBuf,
    /// Head-side lockfile path
    pub head: PathBuf,
    /// Output format
    pub format: ReportFormat,
    /// Diff behavior knobs
    pub options: DiffOptions,
    /// Exit non-zero when changes are detected
    pub fail_on_change: bool,
    /// Disable colored output
    pub no_color: bool,
}

/// Configuration for the CI `comment` command.
#[cfg(feature = "publish")]
#[derive(Debug, Clone)]
pub struct CommentConfig {
    /// Repository in `owner/name` form
    pub repository: String,
    /// Pull request number
    pub pr_number: u64,
    /// Base commit reference
    pub base_ref: String,
    /// Head commit reference
    pub head_ref: String,
    /// Access token for the hosting API
    pub token: String,
    /// Lockfile path within the repository
    pub lockfile_path: String,
    /// Diff behavior knobs
    pub options: DiffOptions,
    /// Render and print the comment body without delivering it
    pub dry_run: bool,
}

/// The slice of a pull-request event payload this tool consumes.
#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    number: u64,
}

/// Read the pull request number from a CI event payload file.
///
/// The payload at `GITHUB_EVENT_PATH` is the full webhook event; only its
/// top-level `number` field matters here.
pub fn pr_number_from_event(path: &Path) -> Result<u64> {
    let content = std::fs::read_to_string(path).map_err(|e| PipfileDiffError::io(path, e))?;
    let event: PullRequestEvent = serde_json::from_str(&content).map_err(|e| {
        PipfileDiffError::config(format!(
            "event payload at {} has no usable pull request number: {e}",
            path.display()
        ))
    })?;
    Ok(event.number)
}
