//! Markdown report generator for pull-request comments.
//!
//! The body opens with a hidden HTML comment marker; the publisher scans
//! existing PR comments for it to decide between updating its own prior
//! comment and creating a new one.

use super::{ReportContext, ReportError, ReportFormat, ReportGenerator, NO_CHANGES_LINE};
use crate::diff::{ChangeEntry, ChangeKind, ChangeSet};
use std::fmt::Write as _;

/// Hidden marker identifying comments produced by this tool.
pub const COMMENT_MARKER: &str = "<!-- pipfile-diff -->";

/// Markdown reporter producing a PR comment body.
#[derive(Debug, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new markdown reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// One line inside a fenced block.
    fn render_line(entry: &ChangeEntry) -> String {
        let name = entry.name.raw();
        match entry.kind {
            ChangeKind::Added => {
                let after = entry.after.as_ref().map(|s| s.describe()).unwrap_or_default();
                spec_line(name, &entry.after, &after)
            }
            ChangeKind::Removed => {
                let before = entry
                    .before
                    .as_ref()
                    .map(|s| s.describe())
                    .unwrap_or_default();
                spec_line(name, &entry.before, &before)
            }
            ChangeKind::Changed | ChangeKind::Unchanged => {
                let before = entry
                    .before
                    .as_ref()
                    .map(|s| s.describe())
                    .unwrap_or_default();
                let after = entry.after.as_ref().map(|s| s.describe()).unwrap_or_default();
                format!("{name} {before} => {after}")
            }
        }
    }

    fn render_block(
        out: &mut String,
        title: &str,
        entries: &[&ChangeEntry],
    ) -> Result<(), ReportError> {
        if entries.is_empty() {
            return Ok(());
        }
        writeln!(out, "**{title}**")?;
        writeln!(out, "```")?;
        for entry in entries {
            writeln!(out, "{}", Self::render_line(entry))?;
        }
        writeln!(out, "```")?;
        Ok(())
    }
}

/// `name==version` for version pins, `name @ backend:url@ref` for VCS pins.
fn spec_line(name: &str, spec: &Option<crate::model::DependencySpec>, described: &str) -> String {
    match spec {
        Some(crate::model::DependencySpec::Versioned(_)) => format!("{name}=={described}"),
        _ => format!("{name} @ {described}"),
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(
        &self,
        changes: &ChangeSet,
        context: &ReportContext,
    ) -> Result<String, ReportError> {
        let lockfile = if context.lockfile.is_empty() {
            "Pipfile.lock"
        } else {
            &context.lockfile
        };

        let mut out = String::new();
        writeln!(out, "{COMMENT_MARKER}")?;
        writeln!(out)?;

        if changes.is_empty() {
            writeln!(out, "{NO_CHANGES_LINE}")?;
            return Ok(out);
        }

        writeln!(out, "Dependency changes from `{lockfile}`:")?;
        writeln!(out)?;

        for (section, entries) in changes.by_section() {
            writeln!(out, "### {section}")?;
            writeln!(out)?;
            let changed: Vec<_> = entries
                .iter()
                .filter(|e| e.kind == ChangeKind::Changed)
                .collect();
            let added: Vec<_> = entries
                .iter()
                .filter(|e| e.kind == ChangeKind::Added)
                .collect();
            let removed: Vec<_> = entries
                .iter()
                .filter(|e| e.kind == ChangeKind::Removed)
                .collect();
            Self::render_block(&mut out, "Changed", &changed)?;
            Self::render_block(&mut out, "Added", &added)?;
            Self::render_block(&mut out, "Removed", &removed)?;
            writeln!(out)?;
        }

        Ok(out.trim_end().to_string() + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}
