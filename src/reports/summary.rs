//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportContext, ReportError, ReportFormat, ReportGenerator, NO_CHANGES_LINE};
use crate::diff::{ChangeEntry, ChangeKind, ChangeSet};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn render_entry(&self, entry: &ChangeEntry) -> String {
        let name = entry.name.raw();
        match entry.kind {
            ChangeKind::Added => {
                let after = entry.after.as_ref().map(|s| s.describe()).unwrap_or_default();
                format!("  {} {name} {after}", self.color("+", "green"))
            }
            ChangeKind::Removed => {
                let before = entry
                    .before
                    .as_ref()
                    .map(|s| s.describe())
                    .unwrap_or_default();
                format!("  {} {name} {before}", self.color("-", "red"))
            }
            ChangeKind::Changed | ChangeKind::Unchanged => {
                let before = entry
                    .before
                    .as_ref()
                    .map(|s| s.describe())
                    .unwrap_or_default();
                let after = entry.after.as_ref().map(|s| s.describe()).unwrap_or_default();
                format!("  {} {name} {before} → {after}", self.color("~", "yellow"))
            }
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(
        &self,
        changes: &ChangeSet,
        context: &ReportContext,
    ) -> Result<String, ReportError> {
        if changes.is_empty() {
            return Ok(NO_CHANGES_LINE.to_string());
        }

        let mut lines = Vec::new();

        let lockfile = if context.lockfile.is_empty() {
            "Pipfile.lock"
        } else {
            &context.lockfile
        };
        lines.push(self.color(&format!("{lockfile} diff summary"), "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let (Some(base), Some(head)) = (&context.base_ref, &context.head_ref) {
            lines.push(format!("{}  {} → {}", self.color("Refs:", "cyan"), base, head));
        }

        let summary = &changes.summary;
        lines.push(format!(
            "{}  {} added, {} removed, {} changed",
            self.color("Changes:", "cyan"),
            summary.added,
            summary.removed,
            summary.changed,
        ));

        for (section, entries) in changes.by_section() {
            lines.push(String::new());
            lines.push(self.color(&format!("[{section}]"), "bold"));
            for entry in entries {
                lines.push(self.render_entry(entry));
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ChangeSummary, DiffEngine};
    use crate::model::{DependencyName, DependencySpec, ManifestSnapshot, VersionedSpec};

    fn one_change() -> ChangeSet {
        let mut base = ManifestSnapshot::empty();
        base.sections.entry("default".to_string()).or_default().insert(
            DependencyName::new("requests"),
            DependencySpec::Versioned(VersionedSpec::new("2.28.0")),
        );
        let mut head = ManifestSnapshot::empty();
        head.sections.entry("default".to_string()).or_default().insert(
            DependencyName::new("requests"),
            DependencySpec::Versioned(VersionedSpec::new("2.31.0")),
        );
        DiffEngine::new().diff(&base, &head)
    }

    #[test]
    fn test_empty_change_set_renders_no_changes_line() {
        let report = SummaryReporter::new()
            .no_color()
            .generate(&ChangeSet::default(), &ReportContext::default())
            .expect("rendering cannot fail");
        assert_eq!(report, NO_CHANGES_LINE);
    }

    #[test]
    fn test_changed_entry_rendering() {
        let report = SummaryReporter::new()
            .no_color()
            .generate(&one_change(), &ReportContext::for_lockfile("Pipfile.lock"))
            .expect("rendering cannot fail");

        assert!(report.contains("Pipfile.lock diff summary"));
        assert!(report.contains("[default]"));
        assert!(report.contains("~ requests 2.28.0 → 2.31.0"));
        assert!(report.contains("0 added, 0 removed, 1 changed"));
    }

    #[test]
    fn test_refs_line_only_when_both_present() {
        let mut context = ReportContext::for_lockfile("Pipfile.lock");
        context.base_ref = Some("abc123".to_string());

        let report = SummaryReporter::new()
            .no_color()
            .generate(&one_change(), &context)
            .expect("rendering cannot fail");
        assert!(!report.contains("Refs:"));

        context.head_ref = Some("def456".to_string());
        let report = SummaryReporter::new()
            .no_color()
            .generate(&one_change(), &context)
            .expect("rendering cannot fail");
        assert!(report.contains("Refs:  abc123 → def456"));
    }

    #[test]
    fn test_colored_output_contains_escapes() {
        let report = SummaryReporter::new()
            .generate(&one_change(), &ReportContext::default())
            .expect("rendering cannot fail");
        assert!(report.contains("\x1b["));
    }

    #[test]
    fn test_summary_counts_match() {
        let changes = one_change();
        assert_eq!(
            changes.summary,
            ChangeSummary {
                added: 0,
                removed: 0,
                changed: 1
            }
        );
    }
}
