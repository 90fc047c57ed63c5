//! Output formatting for CLI display.
//!
//! Report types serialize to JSON for `--json` and implement
//! [`PrettyPrint`] for plain terminal output.

use serde::Serialize;

use crate::CommitSet;

/// Trait for human-readable output.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

/// Result of `next-version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    pub project: String,
    pub version: u64,
}

impl PrettyPrint for VersionReport {
    /// Just the number, so scripts can capture it.
    fn pretty_print(&self) -> String {
        self.version.to_string()
    }
}

/// Result of `commits`.
#[derive(Debug, Clone, Serialize)]
pub struct CommitsReport {
    pub project: String,
    pub count: usize,
    pub commits: Vec<String>,
}

impl CommitsReport {
    /// Report the commits of `project` in sorted order.
    pub fn new(project: &str, commits: &CommitSet) -> Self {
        Self {
            project: project.to_string(),
            count: commits.len(),
            commits: commits.sorted(),
        }
    }
}

impl PrettyPrint for CommitsReport {
    fn pretty_print(&self) -> String {
        self.commits.join("\n")
    }
}

/// Result of `tag`.
#[derive(Debug, Clone, Serialize)]
pub struct TagReport {
    pub project: String,
    pub tag: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl PrettyPrint for TagReport {
    fn pretty_print(&self) -> String {
        format!("Tagged {} as {} in {}", self.git_ref, self.tag, self.project)
    }
}
