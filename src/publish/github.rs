//! GitHub REST API client.
//!
//! Implements both collaborator traits against the v3 REST API: the contents
//! endpoint (with the `raw` media type) supplies lockfile snapshots, and the
//! issue-comment endpoints deliver the report. Comment idempotency works by
//! scanning existing PR comments for the hidden marker the markdown reporter
//! embeds.

use super::{CommentPublisher, SnapshotSource};
use crate::error::{PipfileDiffError, PublishErrorKind, Result};
use crate::reports::COMMENT_MARKER;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    /// Base URL for the REST API
    pub api_base: String,
    /// Repository in `owner/name` form
    pub repository: String,
    /// Access token for authentication
    pub token: String,
    /// Path of the lockfile within the repository
    pub lockfile_path: String,
    /// Request timeout
    pub timeout: Duration,
}

impl GithubClientConfig {
    /// Config for the public GitHub API.
    #[must_use]
    pub fn new(repository: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            repository: repository.into(),
            token: token.into(),
            lockfile_path: "Pipfile.lock".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// One issue comment, as returned by the comments endpoint.
#[derive(Debug, Deserialize)]
struct IssueComment {
    id: u64,
    #[serde(default)]
    body: Option<String>,
}

/// Find the id of the comment previously posted by this tool, if any.
fn find_marker_comment(comments: &[IssueComment]) -> Option<u64> {
    comments
        .iter()
        .find(|c| {
            c.body
                .as_deref()
                .is_some_and(|b| b.starts_with(COMMENT_MARKER))
        })
        .map(|c| c.id)
}

/// Helper to convert reqwest errors to publish errors
fn network_error(msg: &str, err: reqwest::Error) -> PipfileDiffError {
    PipfileDiffError::publish(msg, PublishErrorKind::Network(err.to_string()))
}

/// Helper to create API errors
fn api_error(context: &str, status: StatusCode, body: &str) -> PipfileDiffError {
    let kind = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        PublishErrorKind::Auth(format!("{status}: {body}"))
    } else {
        PublishErrorKind::Api(format!("{status}: {body}"))
    };
    PipfileDiffError::publish(context, kind)
}

/// HTTP client for the GitHub REST API.
pub struct GithubClient {
    client: Client,
    config: GithubClientConfig,
}

impl GithubClient {
    /// Create a new GitHub client.
    pub fn new(config: GithubClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| network_error("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.config.token)
    }

    fn list_comments(&self, pr_number: u64) -> Result<Vec<IssueComment>> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments?per_page=100",
            self.config.api_base, self.config.repository, pr_number
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .map_err(|e| network_error("Listing PR comments failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(api_error("listing PR comments", status, &body));
        }
        response.json().map_err(|e| {
            PipfileDiffError::publish(
                "listing PR comments",
                PublishErrorKind::InvalidResponse(e.to_string()),
            )
        })
    }

    fn post_comment(&self, url: &str, method_patch: bool, body: &str) -> Result<()> {
        let request = if method_patch {
            self.client.patch(url)
        } else {
            self.client.post(url)
        };
        let response = request
            .header("Authorization", self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&serde_json::json!({ "body": body }))
            .send()
            .map_err(|e| network_error("Delivering comment failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(api_error("delivering comment", status, &text));
        }
        Ok(())
    }
}

impl SnapshotSource for GithubClient {
    fn fetch(&self, commit_ref: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/repos/{}/contents/{}?ref={}",
            self.config.api_base, self.config.repository, self.config.lockfile_path, commit_ref
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            // The raw media type returns file content directly, skipping the
            // base64 JSON envelope.
            .header("Accept", "application/vnd.github.raw+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .map_err(|e| network_error("Fetching lockfile failed", e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(
                commit_ref,
                path = %self.config.lockfile_path,
                "Lockfile absent at commit; treating as empty snapshot"
            );
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(api_error("fetching lockfile", status, &body));
        }
        let text = response
            .text()
            .map_err(|e| network_error("Reading lockfile response failed", e))?;
        Ok(Some(text))
    }
}

impl CommentPublisher for GithubClient {
    fn publish(&self, pr_number: u64, body: &str) -> Result<()> {
        let comments = self.list_comments(pr_number)?;
        match find_marker_comment(&comments) {
            Some(comment_id) => {
                tracing::info!(comment_id, "Updating existing diff comment");
                let url = format!(
                    "{}/repos/{}/issues/comments/{}",
                    self.config.api_base, self.config.repository, comment_id
                );
                self.post_comment(&url, true, body)
            }
            None => {
                tracing::info!(pr_number, "Creating diff comment");
                let url = format!(
                    "{}/repos/{}/issues/{}/comments",
                    self.config.api_base, self.config.repository, pr_number
                );
                self.post_comment(&url, false, body)
            }
        }
    }
}
