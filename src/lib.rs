//! **Dependency diff summaries for `Pipfile.lock` changes.**
//!
//! `pipfile-diff` compares two snapshots of a `Pipfile.lock` manifest — the
//! base and head of a pull request — and produces a deterministic,
//! human-readable summary of dependency changes: additions, removals, and
//! version or source changes, including dependencies pinned to
//! source-control refs rather than published versions.
//!
//! The crate is built around a pure core: parsing never performs I/O beyond
//! the text it is handed, diffing raises no errors, and the same pair of
//! input texts always renders the same report. Fetching lockfile revisions
//! from the hosting platform and delivering the report as a PR comment are
//! thin collaborators behind traits in [`publish`], gated by the `publish`
//! feature.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the normalized representation. A [`ManifestSnapshot`]
//!   maps section names to dependency entries; each entry is a
//!   [`DependencySpec`] — either a pinned version with integrity hashes or a
//!   VCS ref. Names are canonicalized once at parse time, so `My-Pkg` and
//!   `my_pkg` are the same dependency everywhere downstream.
//! - **[`parsers`]**: turns raw `Pipfile.lock` text into a snapshot, or
//!   fails loudly — a partially-parsed snapshot could under-report changes,
//!   so there is no partial success.
//! - **[`diff`]**: the [`DiffEngine`] classifies every dependency across the
//!   union of sections and names, and returns a [`ChangeSet`] ordered by
//!   (section, canonical name).
//! - **[`reports`]**: renders a change set as terminal text or as a
//!   pull-request comment body carrying a hidden marker for idempotent
//!   updates.
//! - **[`pipeline`]**: stage helpers wiring the above together, plus the
//!   CI exit codes.
//!
//! ## Example
//!
//! ```
//! use pipfile_diff::{parse_lockfile_str, ChangeKind, DiffEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let base = parse_lockfile_str(
//!         r#"{"default": {"requests": {"version": "==2.28.0"}}}"#,
//!     )?;
//!     let head = parse_lockfile_str(
//!         r#"{"default": {"requests": {"version": "==2.31.0"}}}"#,
//!     )?;
//!
//!     let changes = DiffEngine::new().diff(&base, &head);
//!     assert_eq!(changes.entries.len(), 1);
//!     assert_eq!(changes.entries[0].kind, ChangeKind::Changed);
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
#[cfg(feature = "publish")]
pub mod publish;
pub mod reports;

// Re-export main types for convenience
pub use config::DiffInvocation;
#[cfg(feature = "publish")]
pub use config::{pr_number_from_event, CommentConfig};
pub use diff::{ChangeEntry, ChangeKind, ChangeSet, ChangeSummary, DiffEngine, DiffOptions};
pub use error::{ParseErrorKind, PipfileDiffError, Result};
pub use model::{
    canonicalize_name, DependencyName, DependencySpec, ManifestSnapshot, RefKind, Section,
    VcsBackend, VcsSpec, VersionedSpec,
};
pub use parsers::{parse_lockfile, parse_lockfile_str, LockfileParser, PipfileLockParser,
    SectionSchema};
#[cfg(feature = "publish")]
pub use publish::{CommentPublisher, GithubClient, GithubClientConfig, SnapshotSource};
pub use reports::{
    MarkdownReporter, ReportContext, ReportFormat, ReportGenerator, SummaryReporter,
    COMMENT_MARKER, NO_CHANGES_LINE,
};
