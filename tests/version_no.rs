//! Build-number derivation against a mocked GitLab API.
//!
//! Uses wiremock to serve project listings and paginated build listings.

use gitlab_buildno::{
    aggregate_commits, next_version_no, ApiVersion, ClientConfig, GitLabClient, GitLabError,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JOBS: &str = "/api/v4/projects/7/jobs";

fn builds(commits: &[&str]) -> Value {
    Value::Array(
        commits
            .iter()
            .zip(1..)
            .map(|(commit, id)| json!({"id": id, "status": "success", "commit": {"id": commit}}))
            .collect(),
    )
}

fn next_link(server: &MockServer, page: u32) -> String {
    format!(
        "<{}{}?page={}&per_page=3>; rel=\"next\", <{}{}?page=1&per_page=3>; rel=\"first\"",
        server.uri(),
        JOBS,
        page,
        server.uri(),
        JOBS
    )
}

async fn mount_projects(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("per_page", "1000"))
        .and(query_param("membership", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "name": "Beta"},
            {"id": 7, "name": "Alpha", "path_with_namespace": "ci/alpha"}
        ])))
        .mount(server)
        .await;
}

/// First page of the build listing, requested without a `page` parameter.
async fn mount_first_page(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(JOBS))
        .and(query_param("per_page", "1000"))
        .respond_with(response)
        .with_priority(10)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(JOBS))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .with_priority(1)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> GitLabClient {
    GitLabClient::new("test-token", &server.uri()).unwrap()
}

/// Alpha: c1, c2, c1 on the first page and c3 on the second.
async fn mount_alpha(server: &MockServer) {
    mount_projects(server).await;
    mount_first_page(
        server,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(server, 2).as_str())
            .set_body_json(builds(&["c1", "c2", "c1"])),
    )
    .await;
    mount_page(
        server,
        2,
        ResponseTemplate::new(200).set_body_json(builds(&["c3"])),
    )
    .await;
}

#[tokio::test]
async fn test_alpha_commits_span_two_pages() {
    let server = MockServer::start().await;
    mount_alpha(&server).await;

    let commits = aggregate_commits(&client(&server), 7).await.unwrap();
    assert_eq!(commits.sorted(), vec!["c1", "c2", "c3"]);
}

#[tokio::test]
async fn test_alpha_next_version_is_four() {
    let server = MockServer::start().await;
    mount_alpha(&server).await;

    assert_eq!(next_version_no(&client(&server), "Alpha").await.unwrap(), 4);
}

#[tokio::test]
async fn test_duplicates_across_pages_count_once() {
    let server = MockServer::start().await;
    mount_projects(&server).await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(&server, 2).as_str())
            .set_body_json(builds(&["a", "b"])),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(&server, 3).as_str())
            .set_body_json(builds(&["b", "c"])),
    )
    .await;
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(builds(&["a", "c", "d"])),
    )
    .await;

    let client = client(&server);
    assert_eq!(client.next_version_no("Alpha").await.unwrap(), 5);
}

#[tokio::test]
async fn test_project_without_builds_is_version_one() {
    let server = MockServer::start().await;
    mount_projects(&server).await;
    mount_first_page(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    assert_eq!(client(&server).next_version_no("Alpha").await.unwrap(), 1);
}

#[tokio::test]
async fn test_builds_without_commit_are_skipped() {
    let server = MockServer::start().await;
    mount_projects(&server).await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "commit": {"id": "c1"}},
            {"id": 2, "commit": null},
            {"id": 3}
        ])),
    )
    .await;

    assert_eq!(client(&server).next_version_no("Alpha").await.unwrap(), 2);
}

#[tokio::test]
async fn test_error_record_on_later_page_fails_everything() {
    let server = MockServer::start().await;
    mount_projects(&server).await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(&server, 2).as_str())
            .set_body_json(builds(&["c1", "c2"])),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(403).set_body_json(json!({"message": "403 Forbidden"})),
    )
    .await;

    let err = client(&server).next_version_no("Alpha").await.unwrap_err();
    assert!(matches!(err, GitLabError::Remote(ref m) if m == "403 Forbidden"));
}

#[tokio::test]
async fn test_error_record_with_success_status() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"message": "invalid per_page"})),
    )
    .await;

    let err = aggregate_commits(&client(&server), 7).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid per_page");
}

#[tokio::test]
async fn test_unexpected_shape_is_decode_error() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"jobs": []})),
    )
    .await;

    let err = aggregate_commits(&client(&server), 7).await.unwrap_err();
    assert!(matches!(err, GitLabError::ParseError(_)));
}

#[tokio::test]
async fn test_single_malformed_build_is_decode_error() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([{"commit": {"short_id": "abc"}}])),
    )
    .await;

    let err = aggregate_commits(&client(&server), 7).await.unwrap_err();
    assert!(matches!(err, GitLabError::ParseError(_)));
}

#[tokio::test]
async fn test_several_malformed_builds_are_decode_error() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            {"commit": {"short_id": "abc"}},
            {"commit": {"short_id": "def"}}
        ])),
    )
    .await;

    let err = aggregate_commits(&client(&server), 7).await.unwrap_err();
    assert!(matches!(err, GitLabError::ParseError(_)));
}

#[tokio::test]
async fn test_non_json_error_page_keeps_status() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
    )
    .await;

    let err = aggregate_commits(&client(&server), 7).await.unwrap_err();
    assert!(matches!(
        err,
        GitLabError::ApiError {
            status_code: Some(502),
            ..
        }
    ));
}

#[tokio::test]
async fn test_pagination_loop_is_detected() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(&server, 2).as_str())
            .set_body_json(builds(&["c1"])),
    )
    .await;
    // Page 2 points at itself.
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(&server, 2).as_str())
            .set_body_json(builds(&["c2"])),
    )
    .await;

    let err = aggregate_commits(&client(&server), 7).await.unwrap_err();
    assert!(matches!(err, GitLabError::PaginationLoop(ref url) if url.contains("page=2")));
}

#[tokio::test]
async fn test_page_limit_is_enforced() {
    let server = MockServer::start().await;
    mount_first_page(
        &server,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(&server, 2).as_str())
            .set_body_json(builds(&["c1"])),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200)
            .insert_header("link", next_link(&server, 3).as_str())
            .set_body_json(builds(&["c2"])),
    )
    .await;

    let mut config = ClientConfig::new("test-token", &server.uri());
    config.max_pages = 2;
    let client = GitLabClient::with_config(config).unwrap();

    let err = aggregate_commits(&client, 7).await.unwrap_err();
    assert!(matches!(err, GitLabError::PageLimit { limit: 2 }));
}

#[tokio::test]
async fn test_token_sent_on_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JOBS))
        .and(query_param("per_page", "1000"))
        .and(header("PRIVATE-TOKEN", "test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", next_link(&server, 2).as_str())
                .set_body_json(builds(&["c1"])),
        )
        .with_priority(10)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(JOBS))
        .and(query_param("page", "2"))
        .and(header("PRIVATE-TOKEN", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(builds(&["c2"])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let commits = aggregate_commits(&client(&server), 7).await.unwrap();
    assert_eq!(commits.len(), 2);
}

#[tokio::test]
async fn test_v3_lists_builds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 7, "name": "Alpha"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/projects/7/builds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(builds(&["c1", "c2"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ClientConfig::new("test-token", &server.uri());
    config.api_version = ApiVersion::V3;
    let client = GitLabClient::with_config(config).unwrap();

    assert_eq!(client.next_version_no("Alpha").await.unwrap(), 3);
}

#[tokio::test]
async fn test_unknown_project_has_no_version() {
    let server = MockServer::start().await;
    mount_projects(&server).await;

    let err = client(&server).next_version_no("Gamma").await.unwrap_err();
    assert!(matches!(err, GitLabError::ProjectNotFound(ref name) if name == "Gamma"));
}
