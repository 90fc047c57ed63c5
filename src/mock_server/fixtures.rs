//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{Build, Commit, Project};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Project Fixtures
    // =========================================================================

    /// Create a project with the given id and name.
    pub fn project(id: u64, name: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
            path_with_namespace: Some(format!("ci/{}", name.to_lowercase())),
            default_branch: Some("main".to_string()),
            web_url: None,
        }
    }

    // =========================================================================
    // Build Fixtures
    // =========================================================================

    /// Create a successful build of `commit_id`.
    pub fn build(id: u64, commit_id: &str) -> Build {
        Build {
            id: Some(id),
            status: Some("success".to_string()),
            stage: Some("build".to_string()),
            name: Some("compile".to_string()),
            git_ref: Some("main".to_string()),
            created_at: None,
            commit: Some(Commit {
                id: commit_id.to_string(),
                short_id: Some(commit_id.chars().take(8).collect()),
                title: Some(format!("Commit {commit_id}")),
                author_name: None,
                created_at: None,
            }),
        }
    }

    /// Create a build that carries no commit record.
    pub fn build_without_commit(id: u64) -> Build {
        let mut build = Self::build(id, "");
        build.commit = None;
        build
    }

    /// One build per entry, ids counting up from 1.
    pub fn builds_for_commits(commit_ids: &[&str]) -> Vec<Build> {
        commit_ids
            .iter()
            .zip(1..)
            .map(|(commit, id)| Self::build(id, commit))
            .collect()
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Create the default test scenario.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// Default test scenario.
///
/// - "Alpha" (id 7): builds of c1, c2, c1, c3 → three distinct commits
/// - "Beta" (id 8): no builds
/// - "Gamma" (id 9): one build of g1 and one build without a commit
pub struct DefaultScenario {
    pub projects: Vec<Project>,
    pub builds: Vec<(u64, Vec<Build>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        Self {
            projects: vec![
                Fixtures::project(7, "Alpha"),
                Fixtures::project(8, "Beta"),
                Fixtures::project(9, "Gamma"),
            ],
            builds: vec![
                (7, Fixtures::builds_for_commits(&["c1", "c2", "c1", "c3"])),
                (
                    9,
                    vec![Fixtures::build(1, "g1"), Fixtures::build_without_commit(2)],
                ),
            ],
        }
    }
}
