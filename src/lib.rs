//! Build numbers from GitLab build history.
//!
//! Derives a monotonically increasing build number for a project from the
//! number of distinct commits its CI builds ran against, and tags commits
//! with version labels. Nothing is stored locally; every number is
//! recomputed from the server's build listing.
//!
//! # Quick Start
//!
//! ```no_run
//! use gitlab_buildno::GitLabClient;
//!
//! #[tokio::main]
//! async fn main() -> gitlab_buildno::Result<()> {
//!     // Create client from environment variables
//!     let client = GitLabClient::from_env()?;
//!
//!     let next = client.next_version_no("my-project").await?;
//!     println!("Next build: {next}");
//!
//!     client
//!         .create_tag("my-project", "bcd3098b54bcdb5b864f6299a80890a3740bafdb", &format!("build-{next}"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GITLAB_PRIVATE_TOKEN` (required) - Private token sent as `PRIVATE-TOKEN`
//! - `GITLAB_URL` (required) - Server base URL, e.g. `https://gitlab.example.com`
//! - `GITLAB_API_VERSION` (optional) - `v3` or `v4` (default)
//! - `GITLAB_INSECURE` (optional) - `true` disables TLS certificate verification
//! - `GITLAB_TIMEOUT_SECS` (optional) - Request timeout in seconds

pub mod cli;
mod client;
mod error;
mod models;
mod output;
mod pagination;
mod traits;
mod version;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{ApiVersion, ClientConfig, GitLabClient, DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT};
pub use error::{GitLabError, Result};
pub use pagination::{decode_listing, next_link, Page};

// Re-export traits
pub use traits::List;

// Re-export models
pub use models::{
    // Project types
    Project,
    ProjectListQuery,
    PROJECT_PAGE_SIZE,
    // Build types
    Build,
    BuildListQuery,
    Commit,
    CommitSet,
    BUILD_PAGE_SIZE,
    // Tag types
    TagCreateParams,
};

// Re-export operations
pub use models::{aggregate_commits, distinct_commits, resolve_project_id};
pub use models::{create_tag, create_tag_with};
pub use version::{next_version_no, version_from_commit_count};

pub use output::{CommitsReport, PrettyPrint, TagReport, VersionReport};
