//! Tag endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{check_token, error_response};
use crate::mock_server::state::{MockState, TagRejection};
use crate::TagCreateParams;

/// POST /api/{version}/projects/{id}/repository/tags
pub async fn create_tag(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(project_id): Path<u64>,
    headers: HeaderMap,
    Json(params): Json<TagCreateParams>,
) -> Response {
    let mut state = state.write().await;

    if let Some(rejection) = check_token(&state, &headers) {
        return rejection;
    }

    let body = serde_json::json!({
        "name": params.tag_name,
        "target": params.git_ref,
        "message": params.message,
    });

    match state.create_tag(project_id, params.clone()) {
        Ok(()) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(TagRejection::ProjectNotFound) => {
            error_response(StatusCode::NOT_FOUND, "404 Project Not Found")
        }
        Err(TagRejection::AlreadyExists) => error_response(
            StatusCode::BAD_REQUEST,
            &format!("Tag {} already exists", params.tag_name),
        ),
        Err(TagRejection::InvalidTarget) => error_response(
            StatusCode::BAD_REQUEST,
            &format!("Target {} is invalid", params.git_ref),
        ),
    }
}
