//! Build number derivation.

use crate::client::GitLabClient;
use crate::error::Result;
use crate::models::{aggregate_commits, resolve_project_id};

/// Build number following `distinct_commits` distinct built commits.
#[must_use]
pub fn version_from_commit_count(distinct_commits: usize) -> u64 {
    distinct_commits as u64 + 1
}

/// Next build number for the project named `project_name`.
///
/// The number is the count of distinct commits ever built for the project,
/// plus one. Nothing is stored; it is recomputed from the build history on
/// every call, so deleting builds can make it go down.
///
/// # Errors
///
/// Returns the error of project resolution or of any build-listing page.
#[tracing::instrument(skip(client))]
pub async fn next_version_no(client: &GitLabClient, project_name: &str) -> Result<u64> {
    let project_id = resolve_project_id(client, project_name).await?;
    let commits = aggregate_commits(client, project_id).await?;
    Ok(version_from_commit_count(commits.len()))
}
