//! Parser trait and section schema definitions.

use crate::error::Result;
use crate::model::ManifestSnapshot;
use std::collections::BTreeSet;

/// Confidence that a parser can handle a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// No confidence - definitely not this format
    pub const NONE: Self = Self(0.0);
    /// Low confidence - might be this format
    pub const LOW: Self = Self(0.25);
    /// Medium confidence - likely this format
    pub const MEDIUM: Self = Self(0.5);
    /// High confidence - almost certainly this format
    pub const HIGH: Self = Self(0.75);
    /// Certain - definitely this format
    pub const CERTAIN: Self = Self(1.0);

    /// Get the confidence value
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }

    /// Check if this confidence indicates the format can be parsed
    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.0 >= 0.25
    }
}

impl Default for FormatConfidence {
    fn default() -> Self {
        Self::NONE
    }
}

/// Describes how the top level of a lockfile partitions into sections.
///
/// One key holds lockfile metadata; every other top-level object is a
/// dependency section. A schema may optionally restrict which section names
/// are read, in which case unlisted top-level keys are skipped.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    /// Top-level key holding lockfile metadata rather than dependencies
    pub meta_key: String,
    /// Section names to read; `None` reads every non-meta section
    pub sections: Option<BTreeSet<String>>,
}

impl SectionSchema {
    /// Schema restricted to a fixed set of section names.
    #[must_use]
    pub fn restricted_to<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Whether a top-level key should be read as a section.
    #[must_use]
    pub fn includes(&self, name: &str) -> bool {
        if name == self.meta_key {
            return false;
        }
        match &self.sections {
            Some(allowed) => allowed.contains(name),
            None => true,
        }
    }
}

impl Default for SectionSchema {
    fn default() -> Self {
        Self {
            meta_key: "_meta".to_string(),
            sections: None,
        }
    }
}

/// Trait for lockfile format parsers.
pub trait LockfileParser {
    /// Parse lockfile content into a normalized snapshot.
    fn parse_str(&self, content: &str, schema: &SectionSchema) -> Result<ManifestSnapshot>;

    /// Get format name
    fn format_name(&self) -> &str;

    /// Detect if this parser can handle the given content.
    ///
    /// Lightweight structural check without full parsing.
    fn detect(&self, content: &str) -> FormatConfidence;

    /// Quick check if this parser can likely handle the content.
    fn can_parse(&self, content: &str) -> bool {
        self.detect(content).can_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_includes_everything_but_meta() {
        let schema = SectionSchema::default();
        assert!(schema.includes("default"));
        assert!(schema.includes("develop"));
        assert!(schema.includes("custom-group"));
        assert!(!schema.includes("_meta"));
    }

    #[test]
    fn test_restricted_schema() {
        let schema = SectionSchema::restricted_to(["default", "develop"]);
        assert!(schema.includes("default"));
        assert!(!schema.includes("custom-group"));
        assert!(!schema.includes("_meta"));
    }

    #[test]
    fn test_confidence_thresholds() {
        assert!(!FormatConfidence::NONE.can_parse());
        assert!(FormatConfidence::LOW.can_parse());
        assert!(FormatConfidence::CERTAIN.can_parse());
        assert!(FormatConfidence::default().value() < f32::EPSILON);
    }
}
