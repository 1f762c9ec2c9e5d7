//! Normalized lockfile data model.
//!
//! Regardless of textual quirks in the source lockfile, parsing produces a
//! [`ManifestSnapshot`] built from these types, and everything downstream
//! (diffing, rendering) works only on the normalized form.

mod name;
mod snapshot;

pub use name::{canonicalize_name, DependencyName};
pub use snapshot::{
    DependencySpec, ManifestMeta, ManifestSnapshot, RefKind, Section, VcsBackend, VcsSpec,
    VersionedSpec,
};
