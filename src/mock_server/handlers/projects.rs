//! Project endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Uri},
    response::Response,
};
use tokio::sync::RwLock;

use super::{check_token, paged_response, PageQuery};
use crate::mock_server::state::MockState;

/// GET /api/{version}/projects
pub async fn list_projects(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let state = state.read().await;

    if let Some(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    paged_response(&state, uri.path(), &query, &state.projects)
}
