//! Pipfile.lock parser.
//!
//! A `Pipfile.lock` is a JSON object whose `_meta` key holds generation
//! metadata and whose remaining top-level keys (`default`, `develop`, and
//! arbitrary category names in newer pipenv versions) each map dependency
//! names to entry objects. An entry pins either a published version
//! (`{"version": "==2.31.0", "hashes": [...]}`) or a source-control ref
//! (`{"git": "https://...", "ref": "..."}`), never both.

use super::traits::{FormatConfidence, LockfileParser, SectionSchema};
use crate::error::{ParseErrorKind, PipfileDiffError, Result};
use crate::model::{
    DependencyName, DependencySpec, ManifestMeta, ManifestSnapshot, RefKind, Section, VcsBackend,
    VcsSpec, VersionedSpec,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Lockfile spec versions this parser has been written against. Anything
/// else still parses, with a warning.
const SUPPORTED_SPEC_VERSIONS: [u64; 1] = [6];

/// Parser for `Pipfile.lock` files.
#[derive(Debug, Default)]
pub struct PipfileLockParser;

impl PipfileLockParser {
    /// Create a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse_meta(value: &Value) -> ManifestMeta {
        let content_hash = value
            .pointer("/hash/sha256")
            .and_then(Value::as_str)
            .map(str::to_string);
        let spec_version = value.get("pipfile-spec").and_then(Value::as_u64);
        ManifestMeta {
            content_hash,
            spec_version,
        }
    }

    fn parse_section(section_name: &str, entries: &Map<String, Value>) -> Result<Section> {
        let mut section = Section::new();
        for (raw_name, entry) in entries {
            let fields = entry.as_object().ok_or_else(|| {
                PipfileDiffError::parse(
                    format!("section '{section_name}'"),
                    ParseErrorKind::NotAnObject(format!("entry '{raw_name}'")),
                )
            })?;
            let spec = parse_entry(section_name, raw_name, fields)?;
            section.insert(DependencyName::new(raw_name), spec);
        }
        Ok(section)
    }
}

impl LockfileParser for PipfileLockParser {
    fn parse_str(&self, content: &str, schema: &SectionSchema) -> Result<ManifestSnapshot> {
        let root: Value = serde_json::from_str(content)?;
        let root = root.as_object().ok_or_else(|| {
            PipfileDiffError::parse(
                "lockfile",
                ParseErrorKind::NotAnObject("top level".to_string()),
            )
        })?;

        let meta = root
            .get(&schema.meta_key)
            .map(Self::parse_meta)
            .unwrap_or_default();
        if let Some(version) = meta.spec_version {
            if !SUPPORTED_SPEC_VERSIONS.contains(&version) {
                tracing::warn!(
                    spec_version = version,
                    "Lockfile declares an untested pipfile-spec version; parsing anyway"
                );
            }
        }

        let mut snapshot = ManifestSnapshot {
            meta,
            ..ManifestSnapshot::empty()
        };
        for (key, value) in root {
            if !schema.includes(key) {
                continue;
            }
            let entries = value.as_object().ok_or_else(|| {
                PipfileDiffError::parse(
                    "lockfile",
                    ParseErrorKind::NotAnObject(format!("section '{key}'")),
                )
            })?;
            let section = Self::parse_section(key, entries)?;
            snapshot.sections.insert(key.clone(), section);
        }
        Ok(snapshot)
    }

    fn format_name(&self) -> &str {
        "Pipfile.lock"
    }

    fn detect(&self, content: &str) -> FormatConfidence {
        let trimmed = content.trim_start();
        if !trimmed.starts_with('{') {
            return FormatConfidence::NONE;
        }
        // Marker fields live near the top of a real Pipfile.lock; scanning a
        // prefix keeps detection cheap for large files.
        let head: String = trimmed.chars().take(4096).collect();
        if head.contains("\"pipfile-spec\"") {
            return FormatConfidence::CERTAIN;
        }
        if head.contains("\"_meta\"") {
            return FormatConfidence::HIGH;
        }
        if head.contains("\"default\"") || head.contains("\"develop\"") {
            return FormatConfidence::LOW;
        }
        FormatConfidence::NONE
    }
}

/// Classify one entry object as a versioned or VCS spec.
fn parse_entry(section: &str, name: &str, fields: &Map<String, Value>) -> Result<DependencySpec> {
    let context = || format!("entry '{name}' in section '{section}'");
    let has_version = fields.contains_key("version");
    let backend = VcsBackend::ALL
        .into_iter()
        .find(|b| fields.contains_key(b.field_name()));

    match (has_version, backend) {
        (true, Some(_)) => Err(PipfileDiffError::parse(
            context(),
            ParseErrorKind::AmbiguousSpec {
                section: section.to_string(),
                name: name.to_string(),
            },
        )),
        (false, None) => Err(PipfileDiffError::parse(
            context(),
            ParseErrorKind::MissingSpec {
                section: section.to_string(),
                name: name.to_string(),
            },
        )),
        (true, None) => parse_versioned(section, name, fields),
        (false, Some(backend)) => parse_vcs(section, name, backend, fields),
    }
}

fn string_field<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<Option<&'a str>> {
    match fields.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(PipfileDiffError::parse(
            "lockfile entry",
            ParseErrorKind::InvalidValue {
                field: field.to_string(),
                message: format!("expected a string, found {other}"),
            },
        )),
    }
}

fn parse_versioned(
    section: &str,
    name: &str,
    fields: &Map<String, Value>,
) -> Result<DependencySpec> {
    let version = string_field(fields, "version")?.ok_or_else(|| {
        PipfileDiffError::parse(
            format!("entry '{name}' in section '{section}'"),
            ParseErrorKind::InvalidValue {
                field: "version".to_string(),
                message: "expected a string".to_string(),
            },
        )
    })?;
    // The lockfile writes an exact pin as "==X.Y.Z"; the operator carries no
    // information once pinned.
    let version = version.strip_prefix("==").unwrap_or(version).to_string();

    let mut hashes = BTreeSet::new();
    if let Some(value) = fields.get("hashes") {
        let list = value.as_array().ok_or_else(|| {
            PipfileDiffError::parse(
                format!("entry '{name}' in section '{section}'"),
                ParseErrorKind::InvalidValue {
                    field: "hashes".to_string(),
                    message: "expected an array of strings".to_string(),
                },
            )
        })?;
        for item in list {
            let hash = item.as_str().ok_or_else(|| {
                PipfileDiffError::parse(
                    format!("entry '{name}' in section '{section}'"),
                    ParseErrorKind::InvalidValue {
                        field: "hashes".to_string(),
                        message: format!("expected a string element, found {item}"),
                    },
                )
            })?;
            hashes.insert(hash.to_string());
        }
    }

    let extra = collect_extra(fields, &["version", "hashes"]);
    Ok(DependencySpec::Versioned(VersionedSpec {
        version,
        hashes,
        extra,
    }))
}

fn parse_vcs(
    section: &str,
    name: &str,
    backend: VcsBackend,
    fields: &Map<String, Value>,
) -> Result<DependencySpec> {
    let url = string_field(fields, backend.field_name())?
        .unwrap_or_default()
        .to_string();

    let requested = [
        ("branch", RefKind::Branch),
        ("tag", RefKind::Tag),
        ("rev", RefKind::Rev),
    ]
    .into_iter()
    .find_map(|(field, kind)| {
        string_field(fields, field)
            .map(|v| v.map(|s| (kind, s.to_string())))
            .transpose()
    })
    .transpose()?;

    let locked_ref = string_field(fields, "ref")?.map(str::to_string);

    // `ref` is the lock-resolved commit when an explicit branch/tag/rev was
    // requested; with nothing else present it is itself the requested
    // revision, matching what pipenv writes for plain git pins.
    let (ref_kind, reference, resolved_commit) = match (requested, locked_ref) {
        (Some((kind, reference)), resolved) => (kind, reference, resolved),
        (None, Some(reference)) => (RefKind::Rev, reference, None),
        (None, None) => {
            return Err(PipfileDiffError::parse(
                format!("entry '{name}' in section '{section}'"),
                ParseErrorKind::MissingVcsRef {
                    section: section.to_string(),
                    name: name.to_string(),
                },
            ))
        }
    };

    let extra = collect_extra(
        fields,
        &[backend.field_name(), "branch", "tag", "rev", "ref"],
    );
    Ok(DependencySpec::Vcs(VcsSpec {
        backend,
        url,
        ref_kind,
        reference,
        resolved_commit,
        extra,
    }))
}

/// Everything not explicitly recognized is carried along verbatim.
fn collect_extra(fields: &Map<String, Value>, known: &[&str]) -> BTreeMap<String, Value> {
    fields
        .iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipfileDiffError;

    fn parse(content: &str) -> Result<ManifestSnapshot> {
        PipfileLockParser::new().parse_str(content, &SectionSchema::default())
    }

    #[test]
    fn test_parse_versioned_entry() {
        let snapshot = parse(
            r#"{
                "_meta": {"hash": {"sha256": "cafe"}, "pipfile-spec": 6},
                "default": {
                    "requests": {
                        "version": "==2.31.0",
                        "hashes": ["sha256:bbb", "sha256:aaa"],
                        "index": "pypi",
                        "markers": "python_version >= '3.7'"
                    }
                }
            }"#,
        )
        .expect("valid lockfile");

        assert_eq!(snapshot.meta.content_hash.as_deref(), Some("cafe"));
        let spec = snapshot.get("default", "requests").expect("entry present");
        match spec {
            DependencySpec::Versioned(v) => {
                assert_eq!(v.version, "2.31.0");
                assert_eq!(v.hashes.len(), 2);
                assert!(v.extra.contains_key("index"));
                assert!(v.extra.contains_key("markers"));
            }
            DependencySpec::Vcs(_) => panic!("expected versioned spec"),
        }
    }

    #[test]
    fn test_parse_vcs_entry_branch_with_resolved_ref() {
        let snapshot = parse(
            r#"{
                "default": {
                    "mylib": {
                        "git": "https://github.com/acme/mylib.git",
                        "branch": "main",
                        "ref": "abc123abc123abc123abc123abc123abc123abcd"
                    }
                }
            }"#,
        )
        .expect("valid lockfile");

        match snapshot.get("default", "mylib").expect("entry present") {
            DependencySpec::Vcs(v) => {
                assert_eq!(v.backend, VcsBackend::Git);
                assert_eq!(v.ref_kind, RefKind::Branch);
                assert_eq!(v.reference, "main");
                assert_eq!(
                    v.resolved_commit.as_deref(),
                    Some("abc123abc123abc123abc123abc123abc123abcd")
                );
            }
            DependencySpec::Versioned(_) => panic!("expected VCS spec"),
        }
    }

    #[test]
    fn test_parse_vcs_entry_bare_ref_is_rev() {
        let snapshot = parse(
            r#"{"default": {"mylib": {"git": "https://example.com/r.git", "ref": "v1.0.0"}}}"#,
        )
        .expect("valid lockfile");

        match snapshot.get("default", "mylib").expect("entry present") {
            DependencySpec::Vcs(v) => {
                assert_eq!(v.ref_kind, RefKind::Rev);
                assert_eq!(v.reference, "v1.0.0");
                assert_eq!(v.resolved_commit, None);
            }
            DependencySpec::Versioned(_) => panic!("expected VCS spec"),
        }
    }

    #[test]
    fn test_entry_with_neither_spec_is_malformed() {
        let err = parse(r#"{"default": {"broken": {"index": "pypi"}}}"#).unwrap_err();
        match err {
            PipfileDiffError::Parse { source, .. } => {
                assert!(matches!(source, ParseErrorKind::MissingSpec { .. }));
            }
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_entry_with_both_specs_is_malformed() {
        let err = parse(
            r#"{"default": {"broken": {"version": "==1.0", "git": "https://example.com/r.git"}}}"#,
        )
        .unwrap_err();
        match err {
            PipfileDiffError::Parse { source, .. } => {
                assert!(matches!(source, ParseErrorKind::AmbiguousSpec { .. }));
            }
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_vcs_entry_without_ref_is_malformed() {
        let err =
            parse(r#"{"default": {"broken": {"git": "https://example.com/r.git"}}}"#).unwrap_err();
        match err {
            PipfileDiffError::Parse { source, .. } => {
                assert!(matches!(source, ParseErrorKind::MissingVcsRef { .. }));
            }
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(parse("not json at all").is_err());
        assert!(parse("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_restricted_schema_skips_other_sections() {
        let content = r#"{
            "default": {"flask": {"version": "==3.0.0"}},
            "custom": {"oddball": {"not-a-spec": true}}
        }"#;
        let schema = SectionSchema::restricted_to(["default", "develop"]);
        let snapshot = PipfileLockParser::new()
            .parse_str(content, &schema)
            .expect("custom section is skipped, so its malformed entry never parses");
        assert_eq!(snapshot.entry_count(), 1);
        assert!(!snapshot.sections.contains_key("custom"));
    }

    #[test]
    fn test_detection_confidence() {
        let parser = PipfileLockParser::new();
        assert_eq!(
            parser.detect(r#"{"_meta": {"pipfile-spec": 6}, "default": {}}"#),
            FormatConfidence::CERTAIN
        );
        assert_eq!(
            parser.detect(r#"{"_meta": {}}"#),
            FormatConfidence::HIGH
        );
        assert_eq!(parser.detect("SPDXVersion: SPDX-2.3"), FormatConfidence::NONE);
        assert!(parser.can_parse(r#"{"default": {}}"#));
    }

    #[test]
    fn test_empty_sections_parse() {
        let snapshot = parse(r#"{"default": {}, "develop": {}}"#).expect("valid");
        assert_eq!(snapshot.sections.len(), 2);
        assert_eq!(snapshot.entry_count(), 0);
    }
}
