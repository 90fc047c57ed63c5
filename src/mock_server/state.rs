//! Mock server state management.
//!
//! Provides the in-memory data store for the mock GitLab server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Build, Project, TagCreateParams};

/// Largest page the mock serves, whatever `per_page` asks for.
pub const DEFAULT_MAX_PER_PAGE: u32 = 100;

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Projects in listing order.
    pub projects: Vec<Project>,

    /// Builds indexed by project id, newest first as GitLab lists them.
    pub builds: HashMap<u64, Vec<Build>>,

    /// Tags created so far, indexed by project id.
    pub tags: HashMap<u64, Vec<TagCreateParams>>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// Server-side cap on the page size.
    pub max_per_page: u32,

    /// Absolute URL of the server, used to build `link` headers.
    pub base_url: String,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            builds: HashMap::new(),
            tags: HashMap::new(),
            required_token: None,
            max_per_page: DEFAULT_MAX_PER_PAGE,
            base_url: String::new(),
        }
    }
}

/// Why a tag could not be created.
#[derive(Debug, PartialEq, Eq)]
pub enum TagRejection {
    ProjectNotFound,
    AlreadyExists,
    InvalidTarget,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a project to the state.
    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    /// Add builds for a project.
    pub fn with_builds(mut self, project_id: u64, builds: Vec<Build>) -> Self {
        self.builds.entry(project_id).or_default().extend(builds);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Set the server-side page-size cap.
    pub fn with_max_per_page(mut self, max_per_page: u32) -> Self {
        self.max_per_page = max_per_page.max(1);
        self
    }

    /// Get a project by id.
    pub fn get_project(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Builds of a project; `None` if the project does not exist.
    pub fn list_builds(&self, project_id: u64) -> Option<&[Build]> {
        self.get_project(project_id)?;
        Some(self.builds.get(&project_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Tags of a project.
    pub fn list_tags(&self, project_id: u64) -> &[TagCreateParams] {
        self.tags.get(&project_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record a new tag.
    ///
    /// The target must be a commit some build of the project ran against.
    pub fn create_tag(
        &mut self,
        project_id: u64,
        params: TagCreateParams,
    ) -> Result<(), TagRejection> {
        let builds = self
            .list_builds(project_id)
            .ok_or(TagRejection::ProjectNotFound)?;

        let known_target = builds
            .iter()
            .filter_map(|b| b.commit.as_ref())
            .any(|c| c.id == params.git_ref);
        if !known_target {
            return Err(TagRejection::InvalidTarget);
        }

        if self
            .list_tags(project_id)
            .iter()
            .any(|t| t.tag_name == params.tag_name)
        {
            return Err(TagRejection::AlreadyExists);
        }

        self.tags.entry(project_id).or_default().push(params);
        Ok(())
    }
}
