//! Report generation for change sets.
//!
//! Two output formats:
//! - Summary: compact, optionally colored text for terminal usage
//! - Markdown: pull-request comment body with a hidden marker the publisher
//!   uses to find and update its own prior comment
//!
//! Whatever the format, an empty change set renders an explicit "no
//! dependency changes" line rather than an empty report, so a reader can
//! always distinguish "no changes" from "never ran".

mod markdown;
mod summary;

pub use markdown::{MarkdownReporter, COMMENT_MARKER};
pub use summary::SummaryReporter;

use crate::diff::ChangeSet;
use clap::ValueEnum;
use std::io::Write;
use thiserror::Error;

/// The literal line emitted when the change set is empty.
pub const NO_CHANGES_LINE: &str = "No dependency changes.";

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Compact shell-friendly text
    #[default]
    Summary,
    /// Pull-request comment body
    Markdown,
}

/// Context passed alongside the change set for report headers.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    /// Name of the compared lockfile, e.g. `Pipfile.lock`
    pub lockfile: String,
    /// Base commit ref, when known
    pub base_ref: Option<String>,
    /// Head commit ref, when known
    pub head_ref: Option<String>,
}

impl ReportContext {
    /// Context for a named lockfile with no ref information.
    #[must_use]
    pub fn for_lockfile(lockfile: impl Into<String>) -> Self {
        Self {
            lockfile: lockfile.into(),
            ..Self::default()
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate report text from a change set.
    fn generate(&self, changes: &ChangeSet, context: &ReportContext)
        -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;

    /// Write the report to a writer, with a trailing newline.
    fn write_report(
        &self,
        changes: &ChangeSet,
        context: &ReportContext,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate(changes, context)?;
        writer.write_all(report.as_bytes())?;
        if !report.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Construct the generator for a format.
#[must_use]
pub fn reporter_for(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            let reporter = SummaryReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
    }
}
