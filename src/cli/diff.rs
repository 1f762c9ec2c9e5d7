//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two local lockfiles.

use crate::config::DiffInvocation;
use crate::pipeline::{compute_diff, exit_codes, load_snapshot, render_report};
use crate::reports::ReportContext;
use anyhow::Result;
use std::io::Write as _;

/// Run the diff command, returning the desired exit code.
pub fn run_diff(config: &DiffInvocation) -> Result<i32> {
    let base = load_snapshot(&config.base)?;
    let head = load_snapshot(&config.head)?;

    let changes = compute_diff(&base, &head, config.options);

    let context = ReportContext {
        lockfile: config
            .head
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Pipfile.lock".to_string()),
        base_ref: None,
        head_ref: None,
    };
    let report = render_report(&changes, &context, config.format, !config.no_color)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{report}")?;

    if config.fail_on_change && !changes.is_empty() {
        return Ok(exit_codes::CHANGES_DETECTED);
    }
    Ok(exit_codes::SUCCESS)
}
