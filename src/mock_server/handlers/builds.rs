//! Build listing handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::Response,
};
use tokio::sync::RwLock;

use super::{check_token, error_response, paged_response, PageQuery};
use crate::mock_server::state::MockState;

/// GET /api/v4/projects/{id}/jobs and GET /api/v3/projects/{id}/builds
pub async fn list_builds(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(project_id): Path<u64>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;

    if let Some(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    match state.list_builds(project_id) {
        Some(builds) => paged_response(&state, uri.path(), &query, builds),
        None => error_response(StatusCode::NOT_FOUND, "404 Project Not Found"),
    }
}
