//! Lockfile parsers.
//!
//! Parsing converts raw lockfile text into the normalized
//! [`ManifestSnapshot`](crate::model::ManifestSnapshot) representation. The
//! only format currently supported is `Pipfile.lock`, but the trait seam and
//! confidence-based detection leave room for other lock formats.

mod pipfile_lock;
mod traits;

pub use pipfile_lock::PipfileLockParser;
pub use traits::{FormatConfidence, LockfileParser, SectionSchema};

use crate::error::Result;
use crate::model::ManifestSnapshot;
use std::path::Path;

/// Parse lockfile content with the default section schema.
pub fn parse_lockfile_str(content: &str) -> Result<ManifestSnapshot> {
    PipfileLockParser::new().parse_str(content, &SectionSchema::default())
}

/// Read and parse a lockfile from disk with the default section schema.
pub fn parse_lockfile(path: &Path) -> Result<ManifestSnapshot> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::PipfileDiffError::io(path, e))?;
    parse_lockfile_str(&content)
}
