//! External collaborators: snapshot retrieval and comment delivery.
//!
//! The core pipeline performs no I/O of its own; it talks to the hosting
//! platform only through these two traits. Failures are surfaced unmodified,
//! with no retrying here.

mod github;

pub use github::{GithubClient, GithubClientConfig};

use crate::error::Result;

/// Supplies raw lockfile text for an arbitrary commit reference.
pub trait SnapshotSource {
    /// Fetch the lockfile content at `commit_ref`.
    ///
    /// Returns `Ok(None)` when the file did not exist at that commit; the
    /// caller treats that as an empty snapshot, not an error, since a file
    /// newly added in the head commit has no base counterpart.
    fn fetch(&self, commit_ref: &str) -> Result<Option<String>>;
}

/// Delivers a rendered report to a pull request as a comment.
pub trait CommentPublisher {
    /// Create or update exactly one comment on the pull request.
    ///
    /// Re-delivery of the same run must update the prior comment rather than
    /// duplicate it.
    fn publish(&self, pr_number: u64, body: &str) -> Result<()>;
}
