//! GitLab API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations live on the model types and in [`crate::version`].

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{GitLabError, Result};
use crate::pagination::{self, Page};

const USER_AGENT: &str = concat!("gitlab-buildno/", env!("CARGO_PKG_VERSION"));
const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default ceiling on the number of pages walked for one listing.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// GitLab REST API version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
    /// `/api/v3`, where CI jobs are called builds.
    V3,
    /// `/api/v4`, where CI jobs are called jobs.
    #[default]
    V4,
}

impl ApiVersion {
    /// Path segment under `/api`.
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V3 => "v3",
            ApiVersion::V4 => "v4",
        }
    }

    /// Collection name of a project's CI builds.
    pub fn builds_segment(self) -> &'static str {
        match self {
            ApiVersion::V3 => "builds",
            ApiVersion::V4 => "jobs",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = GitLabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches("/api/").to_ascii_lowercase().as_str() {
            "v3" | "3" => Ok(ApiVersion::V3),
            "v4" | "4" => Ok(ApiVersion::V4),
            other => Err(GitLabError::InvalidConfig(format!(
                "unsupported API version '{other}', expected v3 or v4"
            ))),
        }
    }
}

/// Connection settings for [`GitLabClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `https://gitlab.example.com`.
    pub base_url: String,
    /// Private token sent as `PRIVATE-TOKEN`.
    pub token: String,
    /// REST API version.
    pub api_version: ApiVersion,
    /// Per-request timeout. Expiry surfaces as [`GitLabError::HttpError`].
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    ///
    /// Only for self-hosted servers with self-signed certificates. This
    /// disables protection against impersonation of the server.
    pub accept_invalid_certs: bool,
    /// Maximum number of pages fetched for a single listing.
    pub max_pages: u32,
}

impl ClientConfig {
    /// Settings with defaults for everything but the server and the token.
    pub fn new(token: &str, base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            token: token.to_string(),
            api_version: ApiVersion::default(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Read settings from environment variables.
    ///
    /// `GITLAB_PRIVATE_TOKEN` and `GITLAB_URL` are required;
    /// `GITLAB_API_VERSION`, `GITLAB_INSECURE` and `GITLAB_TIMEOUT_SECS`
    /// are optional.
    pub fn from_env() -> Result<Self> {
        let token = env::var("GITLAB_PRIVATE_TOKEN").map_err(|_| {
            GitLabError::ConfigMissing(
                "GITLAB_PRIVATE_TOKEN environment variable not set".to_string(),
            )
        })?;
        let base_url = env::var("GITLAB_URL").map_err(|_| {
            GitLabError::ConfigMissing("GITLAB_URL environment variable not set".to_string())
        })?;

        let mut config = Self::new(&token, &base_url);

        if let Ok(version) = env::var("GITLAB_API_VERSION") {
            config.api_version = version.parse()?;
        }
        if let Ok(insecure) = env::var("GITLAB_INSECURE") {
            config.accept_invalid_certs = parse_flag(&insecure)?;
        }
        if let Ok(secs) = env::var("GITLAB_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                GitLabError::InvalidConfig(format!("GITLAB_TIMEOUT_SECS '{secs}' is not a number"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GitLabError::InvalidConfig(format!(
            "GITLAB_INSECURE '{other}' is not a boolean"
        ))),
    }
}

/// Low-level GitLab API client.
///
/// Handles authentication and HTTP requests. This struct is cheaply
/// cloneable; clones reference the same underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use gitlab_buildno::GitLabClient;
///
/// # async fn example() -> gitlab_buildno::Result<()> {
/// let client = GitLabClient::new("your-token", "https://gitlab.example.com")?;
/// let next = client.next_version_no("my-project").await?;
/// println!("{next}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitLabClient {
    http: Client,
    api_url: Arc<Url>,
    api_version: ApiVersion,
    token: String,
    max_pages: u32,
}

impl fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabClient")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GitLabClient {
    /// Create a client from environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a client for the v4 API with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(token, base_url))
    }

    /// Create a client from explicit settings.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if config.timeout.is_zero() {
            return Err(GitLabError::InvalidConfig(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        let base = config.base_url.trim_end_matches('/');
        let api_url = Url::parse(&format!("{base}/api/{}/", config.api_version))?;

        if config.accept_invalid_certs {
            tracing::warn!(
                host = api_url.host_str().unwrap_or_default(),
                "TLS certificate verification is disabled"
            );
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(GitLabError::HttpError)?;

        Ok(Self {
            http,
            api_url: Arc::new(api_url),
            api_version: config.api_version,
            token: config.token,
            max_pages: config.max_pages.max(1),
        })
    }

    /// Root of the REST API, e.g. `https://gitlab.example.com/api/v4/`.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// The API version this client talks.
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Maximum number of pages fetched for one listing.
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(PRIVATE_TOKEN_HEADER, &self.token)
    }

    /// Fetch the first page of a listing at `path` relative to the API root.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_page<T, Q>(&self, path: &str, query: &Q) -> Result<Page<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.api_url.join(path)?;
        let request = self.authorized(self.http.get(url).query(query));
        Self::read_page(request).await
    }

    /// Fetch a listing page at an absolute cursor URL, taken verbatim.
    #[tracing::instrument(skip(self, url), fields(url = %url))]
    pub async fn get_page_at<T: DeserializeOwned>(&self, url: Url) -> Result<Page<T>> {
        let request = self.authorized(self.http.get(url));
        Self::read_page(request).await
    }

    async fn read_page<T: DeserializeOwned>(request: RequestBuilder) -> Result<Page<T>> {
        let response = request.send().await.map_err(GitLabError::HttpError)?;
        let status = response.status();
        let next = pagination::next_link(response.headers(), response.url())?;
        let body = response.text().await.map_err(GitLabError::HttpError)?;

        let items = match pagination::decode_listing(&body) {
            Err(GitLabError::ParseError(_)) if !status.is_success() => {
                return Err(Self::status_error(status, body));
            }
            decoded => decoded?,
        };

        tracing::debug!(
            status = status.as_u16(),
            items = items.len(),
            has_next = next.is_some(),
            "fetched listing page"
        );
        Ok(Page::new(items, next))
    }

    /// Make a POST request with a JSON body and query parameters.
    ///
    /// The response is returned whatever its status; callers decide what
    /// counts as success.
    #[tracing::instrument(skip(self, query, body))]
    pub async fn post<Q, B>(&self, path: &str, query: &Q, body: &B) -> Result<Response>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = self.api_url.join(path)?;

        self.authorized(self.http.post(url).query(query).json(body))
            .send()
            .await
            .map_err(GitLabError::HttpError)
    }

    fn status_error(status: StatusCode, body: String) -> GitLabError {
        let message = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body
        };
        GitLabError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        }
    }

    /// Resolve a project name to its numeric id.
    ///
    /// See [`crate::resolve_project_id`].
    pub async fn resolve_project_id(&self, project_name: &str) -> Result<u64> {
        crate::models::resolve_project_id(self, project_name).await
    }

    /// Next build number for a project.
    ///
    /// See [`crate::next_version_no`].
    pub async fn next_version_no(&self, project_name: &str) -> Result<u64> {
        crate::version::next_version_no(self, project_name).await
    }

    /// Tag `commit_id` of a project as `tag_name`.
    ///
    /// See [`crate::create_tag`].
    pub async fn create_tag(&self, project_name: &str, commit_id: &str, tag_name: &str) -> Result<()> {
        crate::models::create_tag(self, project_name, commit_id, tag_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = GitLabClient::new("test-token", "https://gitlab.example.com").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("GitLabClient"));
        assert!(debug.contains("api_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_config_debug_hides_token() {
        let config = ClientConfig::new("secret-token", "https://gitlab.example.com");
        assert!(!format!("{:?}", config).contains("secret-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = GitLabClient::new("token", "https://gitlab.example.com").unwrap();
        let client2 = GitLabClient::new("token", "https://gitlab.example.com/").unwrap();
        assert_eq!(client1.api_url().as_str(), client2.api_url().as_str());
        assert_eq!(client1.api_url().as_str(), "https://gitlab.example.com/api/v4/");
    }

    #[test]
    fn test_api_version_path() {
        let mut config = ClientConfig::new("token", "https://ci.example.com/gitlab");
        config.api_version = ApiVersion::V3;
        let client = GitLabClient::with_config(config).unwrap();
        assert_eq!(client.api_url().as_str(), "https://ci.example.com/gitlab/api/v3/");
        assert_eq!(client.api_version().builds_segment(), "builds");
    }

    #[test]
    fn test_api_version_parse() {
        assert_eq!("v3".parse::<ApiVersion>().unwrap(), ApiVersion::V3);
        assert_eq!("/api/v4".parse::<ApiVersion>().unwrap(), ApiVersion::V4);
        assert_eq!("4".parse::<ApiVersion>().unwrap(), ApiVersion::V4);
        assert!("v5".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("no").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            GitLabClient::new("token", "not a url"),
            Err(GitLabError::UrlError(_))
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = ClientConfig::new("token", "https://gitlab.example.com");
        config.timeout = Duration::ZERO;
        assert!(matches!(
            GitLabClient::with_config(config),
            Err(GitLabError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_max_pages_at_least_one() {
        let mut config = ClientConfig::new("token", "https://gitlab.example.com");
        config.max_pages = 0;
        assert_eq!(GitLabClient::with_config(config).unwrap().max_pages(), 1);
    }
}
