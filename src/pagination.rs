//! Pagination utilities for GitLab listing responses.
//!
//! GitLab paginates listings with a `link` response header made of
//! comma-separated `<URL>; rel="<relation>"` entries. Only the `next`
//! relation is followed; its URL already carries every query parameter
//! needed for the following request.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{GitLabError, Result};

static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^<>]+)>;\s*rel="next""#).expect("next-link pattern is valid")
});

/// A page of results from a GitLab listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Cursor for the following page, if any.
    pub next: Option<Url>,
}

impl<T> Page<T> {
    /// Create a new page from items and the next cursor.
    #[must_use]
    pub fn new(items: Vec<T>, next: Option<Url>) -> Self {
        Self { items, next }
    }

    /// Whether a following page exists.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Extract the `rel="next"` URL from the response headers.
///
/// Relative links are resolved against `request_url`; absolute links are
/// returned unchanged.
pub fn next_link(headers: &HeaderMap, request_url: &Url) -> Result<Option<Url>> {
    for value in headers.get_all(LINK) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        if let Some(captures) = NEXT_LINK.captures(value) {
            let next = request_url.join(&captures[1])?;
            return Ok(Some(next));
        }
    }
    Ok(None)
}

/// The `message` of an error record, the object GitLab sends in place of
/// a listing when it refuses a request.
fn error_message(value: &Value) -> Option<String> {
    match value.as_object()?.get("message")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Decode a listing body.
///
/// A JSON array of `T` is the listing. An object with a `message` field is
/// the server reporting an error, surfaced as [`GitLabError::Remote`].
/// Anything else, including an array whose elements are not `T`, is a
/// decode error.
pub fn decode_listing<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = error_message(&value) {
        return Err(GitLabError::Remote(message));
    }
    Ok(serde_json::from_value(value)?)
}
