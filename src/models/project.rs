//! Project model and name resolution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::GitLabClient;
use crate::error::{GitLabError, Result};
use crate::pagination::Page;
use crate::traits::List;

/// Page size requested for the project listing.
///
/// Resolution reads a single page only; on servers with more accessible
/// projects than this a name can go unmatched.
pub const PROJECT_PAGE_SIZE: u32 = 1000;

/// A GitLab project.
///
/// Addressed by humans through `name` and by the API through `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Numeric project id.
    pub id: u64,

    /// Project name.
    pub name: String,

    /// Namespaced path (e.g., "group/project").
    #[serde(default)]
    pub path_with_namespace: Option<String>,

    /// Default branch.
    #[serde(default)]
    pub default_branch: Option<String>,

    /// Web URL of the project.
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListQuery {
    /// Number of items per page.
    pub per_page: u32,

    /// Only projects the token's user is a member of.
    pub membership: bool,
}

impl Default for ProjectListQuery {
    fn default() -> Self {
        Self {
            per_page: PROJECT_PAGE_SIZE,
            membership: true,
        }
    }
}

#[async_trait]
impl List for Project {
    type Query = ProjectListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &GitLabClient,
        query: &Self::Query,
        cursor: Option<Url>,
    ) -> Result<Page<Self>> {
        match cursor {
            Some(url) => client.get_page_at(url).await,
            None => client.get_page("projects", query).await,
        }
    }
}

/// Find the id of the project named exactly `project_name`.
///
/// Names are compared by exact string equality.
///
/// # Errors
///
/// Returns [`GitLabError::ProjectNotFound`] if no listed project matches,
/// or the request/decode error of the listing.
#[tracing::instrument(skip(client))]
pub async fn resolve_project_id(client: &GitLabClient, project_name: &str) -> Result<u64> {
    let page = Project::list_page(client, &ProjectListQuery::default(), None).await?;

    if page.has_more() {
        tracing::debug!(
            listed = page.len(),
            "project listing has further pages that are not searched"
        );
    }

    find_project_id(&page.items, project_name)
        .ok_or_else(|| GitLabError::ProjectNotFound(project_name.to_string()))
}

fn find_project_id(projects: &[Project], project_name: &str) -> Option<u64> {
    projects
        .iter()
        .find(|project| project.name == project_name)
        .map(|project| project.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects() -> Vec<Project> {
        serde_json::from_value(serde_json::json!([
            {"id": 3, "name": "alpha", "path_with_namespace": "tools/alpha"},
            {"id": 7, "name": "Alpha", "web_url": "https://gitlab.example.com/ci/Alpha"},
            {"id": 9, "name": "Alpha-ng", "star_count": 2}
        ]))
        .unwrap()
    }

    #[test]
    fn test_exact_name_match() {
        let projects = projects();
        assert_eq!(find_project_id(&projects, "Alpha"), Some(7));
        assert_eq!(find_project_id(&projects, "alpha"), Some(3));
    }

    #[test]
    fn test_no_partial_match() {
        let projects = projects();
        assert_eq!(find_project_id(&projects, "Alp"), None);
        assert_eq!(find_project_id(&projects, "ALPHA"), None);
    }

    #[test]
    fn test_project_requires_id_and_name() {
        let result: std::result::Result<Vec<Project>, _> =
            serde_json::from_value(serde_json::json!([{"name": "no-id"}]));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_query() {
        let query = serde_json::to_value(ProjectListQuery::default()).unwrap();
        assert_eq!(query, serde_json::json!({"per_page": 1000, "membership": true}));
    }
}
