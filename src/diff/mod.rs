//! Dependency diffing between two manifest snapshots.

mod engine;

pub use engine::{ChangeEntry, ChangeKind, ChangeSet, ChangeSummary, DiffEngine, DiffOptions};
