//! Snapshot, section, and dependency spec types.

use super::DependencyName;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How a dependency is pinned in the lockfile.
///
/// A tagged variant rather than a struct of optional fields: an entry is
/// either pinned to a published version or to a source-control ref, never
/// both, and the equality rules in the diff engine match exhaustively on
/// the two cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencySpec {
    /// Pinned to a published version
    Versioned(VersionedSpec),
    /// Pinned to a source-control ref
    Vcs(VcsSpec),
}

impl DependencySpec {
    /// Short human-readable description used by the renderers.
    ///
    /// Versions render as the bare version string (integrity hashes are
    /// deliberately omitted from the human summary). VCS pins render as
    /// `backend:url@reference`, with the resolved commit appended in short
    /// form when present.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Versioned(v) => v.version.clone(),
            Self::Vcs(v) => v.describe(),
        }
    }
}

/// A dependency pinned to a published version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionedSpec {
    /// Version pin with the leading `==` operator stripped
    pub version: String,
    /// Integrity hashes; an unordered set, textual order in the lockfile
    /// carries no meaning
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hashes: BTreeSet<String>,
    /// Unrecognized entry fields, preserved verbatim; never part of equality
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl VersionedSpec {
    /// Create a spec with just a version pin.
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            hashes: BTreeSet::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// A dependency pinned to a source-control ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsSpec {
    /// Source-control backend
    pub backend: VcsBackend,
    /// Repository URL
    pub url: String,
    /// What kind of ref `reference` names
    pub ref_kind: RefKind,
    /// The requested ref (branch name, tag, or revision)
    pub reference: String,
    /// Commit the ref resolved to when the lockfile was generated, if recorded
    pub resolved_commit: Option<String>,
    /// Unrecognized entry fields, preserved verbatim; never part of equality
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl VcsSpec {
    /// `backend:url@reference`, with the short resolved commit in parentheses
    /// when present.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!("{}:{}@{}", self.backend, self.url, self.reference);
        if let Some(commit) = &self.resolved_commit {
            let short: String = commit.chars().take(7).collect();
            out.push_str(&format!(" ({short})"));
        }
        out
    }
}

/// Supported source-control backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsBackend {
    Git,
    Hg,
    Svn,
    Bzr,
}

impl VcsBackend {
    /// The lockfile field name for this backend.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
            Self::Svn => "svn",
            Self::Bzr => "bzr",
        }
    }

    /// All backends, in the order fields are probed during parsing.
    pub const ALL: [Self; 4] = [Self::Git, Self::Hg, Self::Svn, Self::Bzr];
}

impl fmt::Display for VcsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// What kind of ref a VCS pin names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Branch,
    Tag,
    Rev,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => f.write_str("branch"),
            Self::Tag => f.write_str("tag"),
            Self::Rev => f.write_str("rev"),
        }
    }
}

/// One named group of dependencies, e.g. `default` or `develop`.
///
/// Sections are independent namespaces: the same name may appear in both the
/// regular and development sections with different specs.
pub type Section = BTreeMap<DependencyName, DependencySpec>;

/// Lockfile-level metadata, used only for sanity checks and logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMeta {
    /// Content hash recorded under `_meta.hash`
    pub content_hash: Option<String>,
    /// `_meta."pipfile-spec"` format version
    pub spec_version: Option<u64>,
}

/// The full parsed state of one lockfile at one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSnapshot {
    /// Sections keyed by name, each mapping names to specs
    pub sections: BTreeMap<String, Section>,
    /// Lockfile-level metadata; never consulted for diffing
    pub meta: ManifestMeta,
}

impl ManifestSnapshot {
    /// An empty snapshot, representing a lockfile absent at a commit.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of dependency entries across all sections.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    /// Look up a spec by section and raw or canonical dependency name.
    #[must_use]
    pub fn get(&self, section: &str, name: &str) -> Option<&DependencySpec> {
        self.sections
            .get(section)
            .and_then(|s| s.get(&DependencyName::new(name)))
    }
}
