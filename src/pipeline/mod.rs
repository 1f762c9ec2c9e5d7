//! Pipeline orchestration for lockfile diff runs.
//!
//! Shared stage helpers for the fetch → parse → diff → render → publish
//! sequence, reducing duplication across CLI command handlers. The stages
//! before publishing are pure: the same pair of input texts always produces
//! the same report text.

use crate::diff::{ChangeSet, DiffEngine, DiffOptions};
use crate::error::Result;
use crate::model::ManifestSnapshot;
use crate::parsers::{parse_lockfile, parse_lockfile_str};
use crate::reports::{reporter_for, ReportContext, ReportError, ReportFormat};
use std::path::Path;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or no --fail-on-change)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 2;
}

/// Parse a lockfile from disk.
pub fn load_snapshot(path: &Path) -> Result<ManifestSnapshot> {
    let snapshot = parse_lockfile(path)?;
    tracing::debug!(
        path = %path.display(),
        entries = snapshot.entry_count(),
        sections = snapshot.sections.len(),
        "Parsed lockfile"
    );
    Ok(snapshot)
}

/// Parse fetched lockfile content, treating an absent file as empty.
///
/// `None` means the snapshot source reported the file missing at that commit
/// (e.g. a lockfile first added in the head commit); that is an empty
/// snapshot, not an error.
pub fn snapshot_from_fetch(content: Option<&str>) -> Result<ManifestSnapshot> {
    match content {
        Some(text) => parse_lockfile_str(text),
        None => Ok(ManifestSnapshot::empty()),
    }
}

/// Diff two snapshots with the given options.
#[must_use]
pub fn compute_diff(
    base: &ManifestSnapshot,
    head: &ManifestSnapshot,
    options: DiffOptions,
) -> ChangeSet {
    let changes = DiffEngine::with_options(options).diff(base, head);
    tracing::info!(
        added = changes.summary.added,
        removed = changes.summary.removed,
        changed = changes.summary.changed,
        "Computed dependency diff"
    );
    changes
}

/// Render a change set in the requested format.
pub fn render_report(
    changes: &ChangeSet,
    context: &ReportContext,
    format: ReportFormat,
    colored: bool,
) -> std::result::Result<String, ReportError> {
    reporter_for(format, colored).generate(changes, context)
}
