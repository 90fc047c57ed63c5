//! HTTP request handlers for the mock server.

pub mod builds;
pub mod projects;
pub mod tags;

pub use builds::*;
pub use projects::*;
pub use tags::*;

use axum::{
    http::{header::LINK, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::mock_server::state::MockState;

/// Pagination query parameters GitLab accepts on listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GitLab-style error body.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "message": message }))).into_response()
}

/// Reject the request unless it carries the required token.
pub(crate) fn check_token(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    let required = state.required_token.as_deref()?;
    let given = headers.get("private-token").and_then(|v| v.to_str().ok());

    if given == Some(required) {
        None
    } else {
        Some(error_response(StatusCode::UNAUTHORIZED, "401 Unauthorized"))
    }
}

/// Serve one page of `items` with a GitLab `link` header.
///
/// `path` is the request path; page links are absolute URLs under the
/// server's base URL.
pub(crate) fn paged_response<T: serde::Serialize>(
    state: &MockState,
    path: &str,
    query: &PageQuery,
    items: &[T],
) -> Response {
    let per_page = query.per_page.unwrap_or(20).min(state.max_per_page).max(1) as usize;
    let page = query.page.unwrap_or(1).max(1) as usize;
    let total_pages = items.len().div_ceil(per_page).max(1);

    let start = (page - 1) * per_page;
    let body: Vec<&T> = items.iter().skip(start).take(per_page).collect();

    let link_to = |n: usize, rel: &str| {
        format!(
            "<{}{}?page={}&per_page={}>; rel=\"{}\"",
            state.base_url, path, n, per_page, rel
        )
    };

    let mut links = Vec::new();
    if page > 1 && page <= total_pages {
        links.push(link_to(page - 1, "prev"));
    }
    if page < total_pages {
        links.push(link_to(page + 1, "next"));
    }
    links.push(link_to(1, "first"));
    links.push(link_to(total_pages, "last"));

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&links.join(", ")) {
        headers.insert(LINK, value);
    }
    headers.insert("x-total", HeaderValue::from(items.len()));
    headers.insert("x-total-pages", HeaderValue::from(total_pages));

    (StatusCode::OK, headers, Json(body)).into_response()
}
