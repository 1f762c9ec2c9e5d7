//! Core diff engine.
//!
//! Compares two [`ManifestSnapshot`] values and classifies every dependency
//! as added, removed, or changed. The engine performs no I/O and raises no
//! errors: a section or entry missing on one side is ordinary input, and the
//! same pair of snapshots always produces the same ordered change set.

use crate::model::{DependencyName, DependencySpec, ManifestSnapshot, Section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a dependency differs between the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only in head
    Added,
    /// Present only in base
    Removed,
    /// Present in both with differing specs
    Changed,
    /// Present in both with equal specs; filtered out of the change set
    Unchanged,
}

/// One row of the diff result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Section the entry belongs to
    pub section: String,
    /// Dependency name; identity is the canonical form
    pub name: DependencyName,
    /// Classification of the change
    pub kind: ChangeKind,
    /// Spec on the base side, absent for additions
    pub before: Option<DependencySpec>,
    /// Spec on the head side, absent for removals
    pub after: Option<DependencySpec>,
}

/// Count of entries per change kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl ChangeSummary {
    /// Total number of surviving change entries.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.added + self.removed + self.changed
    }
}

/// The ordered diff result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Entries ordered by (section, canonical name)
    pub entries: Vec<ChangeEntry>,
    /// Per-kind counts
    pub summary: ChangeSummary,
}

impl ChangeSet {
    /// Whether the two snapshots had no dependency differences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries grouped by section, in section order.
    ///
    /// Entries are already sorted, so each group is a contiguous slice.
    pub fn by_section(&self) -> impl Iterator<Item = (&str, &[ChangeEntry])> {
        SectionGroups {
            entries: &self.entries,
        }
    }
}

struct SectionGroups<'a> {
    entries: &'a [ChangeEntry],
}

impl<'a> Iterator for SectionGroups<'a> {
    type Item = (&'a str, &'a [ChangeEntry]);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.entries.first()?;
        let section = first.section.as_str();
        let end = self
            .entries
            .iter()
            .position(|e| e.section != section)
            .unwrap_or(self.entries.len());
        let (group, rest) = self.entries.split_at(end);
        self.entries = rest;
        Some((section, group))
    }
}

/// Tunable diff behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Treat a differing resolved commit as a change even when the requested
    /// ref is identical.
    ///
    /// Off by default: a lockfile regeneration that merely re-resolves the
    /// same branch tip would otherwise flag every VCS pin.
    pub strict_vcs_commit: bool,
}

/// Computes the classified change set between two snapshots.
#[derive(Debug, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Create an engine with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit options.
    #[must_use]
    pub const fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Compute the ordered change set between base and head.
    #[must_use]
    pub fn diff(&self, base: &ManifestSnapshot, head: &ManifestSnapshot) -> ChangeSet {
        let mut result = ChangeSet::default();

        // Union of section names; BTreeSet gives the lexicographic section
        // order the output contract requires.
        let section_names: BTreeSet<&String> =
            base.sections.keys().chain(head.sections.keys()).collect();

        static EMPTY: Section = Section::new();
        for section_name in section_names {
            let base_section = base.sections.get(section_name).unwrap_or(&EMPTY);
            let head_section = head.sections.get(section_name).unwrap_or(&EMPTY);
            self.diff_section(section_name, base_section, head_section, &mut result);
        }
        result
    }

    fn diff_section(
        &self,
        section_name: &str,
        base: &Section,
        head: &Section,
        result: &mut ChangeSet,
    ) {
        let names: BTreeSet<&DependencyName> = base.keys().chain(head.keys()).collect();
        for name in names {
            let before = base.get(name);
            let after = head.get(name);
            let kind = match (before, after) {
                (None, Some(_)) => ChangeKind::Added,
                (Some(_), None) => ChangeKind::Removed,
                (Some(b), Some(a)) => {
                    if self.specs_equal(b, a) {
                        ChangeKind::Unchanged
                    } else {
                        ChangeKind::Changed
                    }
                }
                (None, None) => continue,
            };
            match kind {
                ChangeKind::Added => result.summary.added += 1,
                ChangeKind::Removed => result.summary.removed += 1,
                ChangeKind::Changed => result.summary.changed += 1,
                ChangeKind::Unchanged => continue,
            }
            // Prefer the head side's raw spelling for display; identity is
            // canonical either way.
            let display_name = if after.is_some() {
                head.get_key_value(name)
            } else {
                base.get_key_value(name)
            }
            .map_or_else(|| name.clone(), |(k, _)| k.clone());
            result.entries.push(ChangeEntry {
                section: section_name.to_string(),
                name: display_name,
                kind,
                before: before.cloned(),
                after: after.cloned(),
            });
        }
    }

    /// Spec equality per the diff contract.
    ///
    /// Versioned specs are equal iff the version strings are byte-equal and
    /// the hash sets are set-equal. VCS specs are equal iff backend, URL, ref
    /// kind, and ref value all match; with an identical requested ref, the
    /// resolved commit is lock-resolution metadata and does not participate
    /// unless `strict_vcs_commit` is set. A versioned spec never equals a
    /// VCS spec. Opaque extra fields never participate.
    fn specs_equal(&self, a: &DependencySpec, b: &DependencySpec) -> bool {
        match (a, b) {
            (DependencySpec::Versioned(a), DependencySpec::Versioned(b)) => {
                a.version == b.version && a.hashes == b.hashes
            }
            (DependencySpec::Vcs(a), DependencySpec::Vcs(b)) => {
                a.backend == b.backend
                    && a.url == b.url
                    && a.ref_kind == b.ref_kind
                    && a.reference == b.reference
                    && (!self.options.strict_vcs_commit
                        || a.resolved_commit == b.resolved_commit)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RefKind, VcsBackend, VcsSpec, VersionedSpec};
    use std::collections::BTreeMap;

    fn versioned(version: &str) -> DependencySpec {
        DependencySpec::Versioned(VersionedSpec::new(version))
    }

    fn vcs(reference: &str, resolved: Option<&str>) -> DependencySpec {
        DependencySpec::Vcs(VcsSpec {
            backend: VcsBackend::Git,
            url: "https://github.com/acme/mylib.git".to_string(),
            ref_kind: RefKind::Branch,
            reference: reference.to_string(),
            resolved_commit: resolved.map(str::to_string),
            extra: BTreeMap::new(),
        })
    }

    fn snapshot(entries: &[(&str, &str, DependencySpec)]) -> ManifestSnapshot {
        let mut snap = ManifestSnapshot::empty();
        for (section, name, spec) in entries {
            snap.sections
                .entry((*section).to_string())
                .or_default()
                .insert(DependencyName::new(name), spec.clone());
        }
        snap
    }

    #[test]
    fn test_version_bump_is_changed() {
        let base = snapshot(&[("default", "requests", versioned("2.28.0"))]);
        let head = snapshot(&[("default", "requests", versioned("2.31.0"))]);

        let result = DiffEngine::new().diff(&base, &head);
        assert_eq!(result.entries.len(), 1);
        let entry = &result.entries[0];
        assert_eq!(entry.kind, ChangeKind::Changed);
        assert_eq!(entry.section, "default");
        assert_eq!(entry.name.canonical(), "requests");
        assert_eq!(entry.before.as_ref().unwrap().describe(), "2.28.0");
        assert_eq!(entry.after.as_ref().unwrap().describe(), "2.31.0");
        assert_eq!(result.summary.changed, 1);
        assert_eq!(result.summary.total(), 1);
    }

    #[test]
    fn test_section_absent_on_one_side_is_all_added() {
        let base = ManifestSnapshot::empty();
        let head = snapshot(&[("default", "flask", versioned("3.0.0"))]);

        let result = DiffEngine::new().diff(&base, &head);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].kind, ChangeKind::Added);
        assert!(result.entries[0].before.is_none());
        assert_eq!(result.entries[0].after.as_ref().unwrap().describe(), "3.0.0");
    }

    #[test]
    fn test_resolved_commit_alone_is_not_a_change() {
        let base = snapshot(&[("default", "mylib", vcs("main", Some("abc123")))]);
        let head = snapshot(&[("default", "mylib", vcs("main", Some("def456")))]);

        let result = DiffEngine::new().diff(&base, &head);
        assert!(result.is_empty());
    }

    #[test]
    fn test_resolved_commit_absent_on_one_side_is_not_a_change() {
        let base = snapshot(&[("default", "mylib", vcs("main", Some("abc123")))]);
        let head = snapshot(&[("default", "mylib", vcs("main", None))]);

        let result = DiffEngine::new().diff(&base, &head);
        assert!(result.is_empty());
    }

    #[test]
    fn test_vcs_reference_change_is_changed() {
        let base = snapshot(&[("default", "mylib", vcs("main", Some("abc123")))]);
        let head = snapshot(&[("default", "mylib", vcs("release", Some("abc123")))]);

        let result = DiffEngine::new().diff(&base, &head);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn test_strict_vcs_commit_flags_reresolution() {
        let base = snapshot(&[("default", "mylib", vcs("main", Some("abc123")))]);
        let head = snapshot(&[("default", "mylib", vcs("main", Some("def456")))]);

        let engine = DiffEngine::with_options(DiffOptions {
            strict_vcs_commit: true,
        });
        let result = engine.diff(&base, &head);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn test_version_to_vcs_switch_is_changed() {
        let base = snapshot(&[("default", "mylib", versioned("1.0.0"))]);
        let head = snapshot(&[("default", "mylib", vcs("main", None))]);

        let result = DiffEngine::new().diff(&base, &head);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn test_hash_set_order_is_irrelevant() {
        let mut a = VersionedSpec::new("1.0.0");
        a.hashes.extend(["sha256:x".to_string(), "sha256:y".to_string()]);
        let mut b = VersionedSpec::new("1.0.0");
        b.hashes.extend(["sha256:y".to_string(), "sha256:x".to_string()]);

        let base = snapshot(&[("default", "pkg", DependencySpec::Versioned(a))]);
        let head = snapshot(&[("default", "pkg", DependencySpec::Versioned(b))]);
        assert!(DiffEngine::new().diff(&base, &head).is_empty());
    }

    #[test]
    fn test_hash_set_difference_is_changed() {
        let mut a = VersionedSpec::new("1.0.0");
        a.hashes.insert("sha256:x".to_string());
        let mut b = VersionedSpec::new("1.0.0");
        b.hashes.insert("sha256:z".to_string());

        let base = snapshot(&[("default", "pkg", DependencySpec::Versioned(a))]);
        let head = snapshot(&[("default", "pkg", DependencySpec::Versioned(b))]);
        let result = DiffEngine::new().diff(&base, &head);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn test_respelled_name_is_not_a_change() {
        let base = snapshot(&[("default", "My-Pkg", versioned("1.0.0"))]);
        let head = snapshot(&[("default", "my_pkg", versioned("1.0.0"))]);
        assert!(DiffEngine::new().diff(&base, &head).is_empty());
    }

    #[test]
    fn test_sections_are_independent_namespaces() {
        let base = snapshot(&[("default", "pytest", versioned("7.0.0"))]);
        let head = snapshot(&[
            ("default", "pytest", versioned("7.0.0")),
            ("develop", "pytest", versioned("8.0.0")),
        ]);

        let result = DiffEngine::new().diff(&base, &head);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].section, "develop");
        assert_eq!(result.entries[0].kind, ChangeKind::Added);
    }

    #[test]
    fn test_output_ordering() {
        let base = snapshot(&[
            ("develop", "zzz", versioned("1.0")),
            ("default", "bbb", versioned("1.0")),
        ]);
        let head = snapshot(&[
            ("develop", "aaa", versioned("1.0")),
            ("default", "ccc", versioned("1.0")),
        ]);

        let result = DiffEngine::new().diff(&base, &head);
        let order: Vec<_> = result
            .entries
            .iter()
            .map(|e| (e.section.as_str(), e.name.canonical()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("default", "bbb"),
                ("default", "ccc"),
                ("develop", "aaa"),
                ("develop", "zzz"),
            ]
        );
    }

    #[test]
    fn test_by_section_groups_contiguously() {
        let base = snapshot(&[("default", "a", versioned("1.0"))]);
        let head = snapshot(&[("develop", "b", versioned("1.0"))]);

        let result = DiffEngine::new().diff(&base, &head);
        let groups: Vec<_> = result
            .by_section()
            .map(|(section, entries)| (section, entries.len()))
            .collect();
        assert_eq!(groups, vec![("default", 1), ("develop", 1)]);
    }

    #[test]
    fn test_empty_snapshots_yield_empty_set() {
        let result = DiffEngine::new().diff(&ManifestSnapshot::empty(), &ManifestSnapshot::empty());
        assert!(result.is_empty());
        assert_eq!(result.summary.total(), 0);
    }
}
