//! Canonical dependency names.
//!
//! Python package names are case-insensitive and treat `-`, `_`, and `.` as
//! interchangeable separators, so `My-Pkg`, `my_pkg`, and `my.pkg` all refer
//! to the same distribution. Canonicalization happens once at parse time;
//! the differ and renderers only ever see [`DependencyName`] and never need
//! to re-normalize.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonicalize a dependency name: ASCII-lowercase, with every run of
/// `-`, `_`, or `.` collapsed to a single `-`.
#[must_use]
pub fn canonicalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_separator = false;
    for c in raw.chars() {
        if matches!(c, '-' | '_' | '.') {
            in_separator = true;
        } else {
            if in_separator {
                out.push('-');
                in_separator = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    // A trailing separator run is preserved as a single dash rather than
    // silently dropped, so distinct raw names stay distinct.
    if in_separator {
        out.push('-');
    }
    out
}

/// A dependency name within one lockfile section.
///
/// Carries the name as written in the lockfile alongside its canonical form.
/// Identity (`Eq`, `Ord`, `Hash`) is defined on the canonical form only, so a
/// re-spelled name never shows up as a spurious add/remove pair.
#[derive(Debug, Clone, Eq)]
pub struct DependencyName {
    /// Name exactly as written in the lockfile
    raw: String,
    /// Canonical form used for identity and ordering
    canonical: String,
}

impl DependencyName {
    /// Create a name from its raw lockfile spelling.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            canonical: canonicalize_name(raw),
        }
    }

    /// The name exactly as written in the lockfile.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The canonical form.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for DependencyName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Hash for DependencyName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl Ord for DependencyName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl PartialOrd for DependencyName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

// Serialized as the raw spelling so names work as JSON map keys; the
// canonical form is recomputed on the way back in.
impl Serialize for DependencyName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for DependencyName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_lowercases() {
        assert_eq!(canonicalize_name("Flask"), "flask");
        assert_eq!(canonicalize_name("REQUESTS"), "requests");
    }

    #[test]
    fn test_canonicalize_collapses_separators() {
        assert_eq!(canonicalize_name("My-Pkg"), "my-pkg");
        assert_eq!(canonicalize_name("my_pkg"), "my-pkg");
        assert_eq!(canonicalize_name("my.pkg"), "my-pkg");
        assert_eq!(canonicalize_name("my-_.pkg"), "my-pkg");
        assert_eq!(canonicalize_name("zope.interface"), "zope-interface");
    }

    #[test]
    fn test_respelled_names_are_equal() {
        let a = DependencyName::new("My-Pkg");
        let b = DependencyName::new("my_pkg");
        assert_eq!(a, b);
        assert_eq!(a.raw(), "My-Pkg");
        assert_eq!(b.raw(), "my_pkg");
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_ordering_is_on_canonical_form() {
        let mut names = vec![
            DependencyName::new("Zope.Interface"),
            DependencyName::new("flask"),
            DependencyName::new("Django"),
        ];
        names.sort();
        let canonical: Vec<_> = names.iter().map(DependencyName::canonical).collect();
        assert_eq!(canonical, vec!["django", "flask", "zope-interface"]);
    }

    #[test]
    fn test_trailing_separator_preserved() {
        assert_ne!(canonicalize_name("pkg"), canonicalize_name("pkg_"));
    }
}
