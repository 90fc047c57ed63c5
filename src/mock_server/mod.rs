//! Mock GitLab server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the parts
//! of the GitLab REST API this crate uses: project listing, paginated build
//! listings with `link` headers, and tag creation. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use gitlab_buildno::mock_server::MockServer;
//! use gitlab_buildno::GitLabClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GitLabClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     assert_eq!(client.next_version_no("Alpha").await.unwrap(), 4);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, TagRejection, DEFAULT_MAX_PER_PAGE};
