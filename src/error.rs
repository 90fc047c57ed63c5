//! Error types for GitLab API operations.

use thiserror::Error;

/// Errors that can occur while talking to a GitLab server.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// Configuration is missing or incomplete.
    #[error("GitLab configuration required: {0}")]
    ConfigMissing(String),

    /// Configuration value could not be interpreted.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No accessible project carries the requested name.
    #[error("No project named '{0}' found")]
    ProjectNotFound(String),

    /// Error reported by the server in its own payload, passed through verbatim.
    #[error("{0}")]
    Remote(String),

    /// Request failed with a status and a body that is not a GitLab error record.
    #[error("GitLab API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A next-page link pointed back at a page that was already fetched.
    #[error("Pagination loop detected at {0}")]
    PaginationLoop(String),

    /// The listing has more pages than the configured ceiling.
    #[error("Listing exceeds the limit of {limit} pages")]
    PageLimit { limit: u32 },
}

/// Result type alias for GitLab operations.
pub type Result<T> = core::result::Result<T, GitLabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_is_verbatim() {
        let err = GitLabError::Remote("403 Forbidden".to_string());
        assert_eq!(err.to_string(), "403 Forbidden");
    }

    #[test]
    fn test_not_found_names_project() {
        let err = GitLabError::ProjectNotFound("Alpha".to_string());
        assert_eq!(err.to_string(), "No project named 'Alpha' found");
    }
}
