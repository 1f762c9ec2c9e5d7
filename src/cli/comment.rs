//! Comment command handler.
//!
//! Implements the `comment` subcommand: fetch the lockfile at the PR's base
//! and head commits, diff, and deliver the rendered report as a single PR
//! comment. Generic over the collaborator traits so the flow is testable
//! without a network.

use crate::config::CommentConfig;
use crate::pipeline::{compute_diff, exit_codes, render_report, snapshot_from_fetch};
use crate::publish::{CommentPublisher, GithubClient, GithubClientConfig, SnapshotSource};
use crate::reports::{ReportContext, ReportFormat};
use anyhow::Result;

/// Run the comment command, returning the desired exit code.
pub fn run_comment(config: &CommentConfig) -> Result<i32> {
    let mut client_config = GithubClientConfig::new(&config.repository, &config.token);
    client_config.lockfile_path.clone_from(&config.lockfile_path);
    let client = GithubClient::new(client_config)?;
    run_comment_with(config, &client, &client)
}

/// The comment flow against explicit collaborators.
pub fn run_comment_with(
    config: &CommentConfig,
    source: &dyn SnapshotSource,
    publisher: &dyn CommentPublisher,
) -> Result<i32> {
    let base_text = source.fetch(&config.base_ref)?;
    let head_text = source.fetch(&config.head_ref)?;
    let base = snapshot_from_fetch(base_text.as_deref())?;
    let head = snapshot_from_fetch(head_text.as_deref())?;

    let changes = compute_diff(&base, &head, config.options);

    let context = ReportContext {
        lockfile: config.lockfile_path.clone(),
        base_ref: Some(config.base_ref.clone()),
        head_ref: Some(config.head_ref.clone()),
    };
    let body = render_report(&changes, &context, ReportFormat::Markdown, false)?;

    if config.dry_run {
        tracing::info!("Dry run; printing comment body instead of delivering it");
        println!("{body}");
        return Ok(exit_codes::SUCCESS);
    }

    publisher.publish(config.pr_number, &body)?;
    tracing::info!(
        pr_number = config.pr_number,
        changes = changes.summary.total(),
        "Delivered dependency diff comment"
    );
    Ok(exit_codes::SUCCESS)
}
