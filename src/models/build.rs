//! Build model and commit aggregation.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::GitLabClient;
use crate::error::Result;
use crate::pagination::Page;
use crate::traits::List;

/// Page size requested for build listings.
pub const BUILD_PAGE_SIZE: u32 = 1000;

/// A CI build (a "job" in API v4).
///
/// Only `commit` takes part in version numbering; the rest is kept for
/// display and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    /// Build id.
    #[serde(default)]
    pub id: Option<u64>,

    /// Build status (e.g., "success", "failed").
    #[serde(default)]
    pub status: Option<String>,

    /// Pipeline stage.
    #[serde(default)]
    pub stage: Option<String>,

    /// Job name.
    #[serde(default)]
    pub name: Option<String>,

    /// Branch or tag the build ran for.
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,

    /// When the build was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// The commit that was built.
    #[serde(default)]
    pub commit: Option<Commit>,
}

/// The commit a build ran against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit id (hash).
    pub id: String,

    /// Abbreviated commit id.
    #[serde(default)]
    pub short_id: Option<String>,

    /// Commit title.
    #[serde(default)]
    pub title: Option<String>,

    /// Commit author.
    #[serde(default)]
    pub author_name: Option<String>,

    /// Commit creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Query for a project's build listing.
#[derive(Debug, Clone, Serialize)]
pub struct BuildListQuery {
    /// Project whose builds are listed.
    #[serde(skip_serializing)]
    pub project_id: u64,

    /// Number of items per page.
    pub per_page: u32,
}

impl BuildListQuery {
    /// Query for all builds of a project.
    #[must_use]
    pub fn for_project(project_id: u64) -> Self {
        Self {
            project_id,
            per_page: BUILD_PAGE_SIZE,
        }
    }
}

#[async_trait]
impl List for Build {
    type Query = BuildListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &GitLabClient,
        query: &Self::Query,
        cursor: Option<Url>,
    ) -> Result<Page<Self>> {
        match cursor {
            Some(url) => client.get_page_at(url).await,
            None => {
                let path = format!(
                    "projects/{}/{}",
                    query.project_id,
                    client.api_version().builds_segment()
                );
                client.get_page(&path, query).await
            }
        }
    }
}

/// Distinct commit ids seen across a project's builds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSet {
    ids: HashSet<String>,
}

impl CommitSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit id. Returns false if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Add the commit of every build that has one.
    pub fn extend_from_builds<I>(&mut self, builds: I)
    where
        I: IntoIterator<Item = Build>,
    {
        self.ids
            .extend(builds.into_iter().filter_map(|b| b.commit).map(|c| c.id));
    }

    /// Whether `id` was seen.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of distinct commits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no commit was seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The ids in lexicographic order.
    #[must_use]
    pub fn sorted(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for CommitSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Collect the distinct commits of every build of a project.
///
/// Follows the listing's `next` links until the last page. A failure on
/// any page fails the whole aggregation; no partial set is returned.
#[tracing::instrument(skip(client))]
pub async fn aggregate_commits(client: &GitLabClient, project_id: u64) -> Result<CommitSet> {
    let query = BuildListQuery::for_project(project_id);

    let commits = Build::fold_pages(client, &query, CommitSet::new(), |mut commits, page| {
        commits.extend_from_builds(page);
        commits
    })
    .await?;

    tracing::info!(project_id, commits = commits.len(), "aggregated build commits");
    Ok(commits)
}

/// Collect the distinct commits of every build of the project named
/// `project_name`.
pub async fn distinct_commits(client: &GitLabClient, project_name: &str) -> Result<CommitSet> {
    let project_id = super::resolve_project_id(client, project_name).await?;
    aggregate_commits(client, project_id).await
}
