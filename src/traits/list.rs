//! List trait for fetching collections of entities.

use std::collections::HashSet;

use async_trait::async_trait;
use url::Url;

use crate::client::GitLabClient;
use crate::error::{GitLabError, Result};
use crate::pagination::Page;

/// List entities with cursor pagination.
///
/// Implementors fetch one page at a time; the first page is built from a
/// query, every following page is the `next` link of the previous one.
///
/// # Example
///
/// ```ignore
/// use gitlab_buildno::{Build, BuildListQuery, GitLabClient, List};
///
/// let client = GitLabClient::from_env()?;
/// let query = BuildListQuery::for_project(42);
///
/// // Fetch a single page
/// let page = Build::list_page(&client, &query, None).await?;
///
/// // Walk every page
/// let total = Build::fold_pages(&client, &query, 0, |n, page| n + page.len()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for the first page.
    type Query: Send + Sync;

    /// Fetch one page.
    ///
    /// # Arguments
    ///
    /// * `client` - The GitLab API client
    /// * `query` - Parameters for the first page
    /// * `cursor` - `None` for the first page, otherwise a `next` link
    ///   requested verbatim
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a listing.
    async fn list_page(
        client: &GitLabClient,
        query: &Self::Query,
        cursor: Option<Url>,
    ) -> Result<Page<Self>>;

    /// Walk every page, merging each one into an accumulator.
    ///
    /// Pages are fetched one after another until a page carries no `next`
    /// link. Any failure aborts the walk and drops the accumulator.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails, if a `next` link points
    /// at a page already fetched, or if the listing is longer than
    /// [`GitLabClient::max_pages`].
    async fn fold_pages<A, F>(
        client: &GitLabClient,
        query: &Self::Query,
        init: A,
        mut merge: F,
    ) -> Result<A>
    where
        A: Send,
        F: FnMut(A, Page<Self>) -> A + Send,
    {
        let limit = client.max_pages();
        let mut visited: HashSet<Url> = HashSet::new();
        let mut fetched = 1;
        let mut acc = init;
        let mut page = Self::list_page(client, query, None).await?;

        loop {
            let next = page.next.clone();
            acc = merge(acc, page);

            let Some(url) = next else {
                break;
            };
            if !visited.insert(url.clone()) {
                return Err(GitLabError::PaginationLoop(url.to_string()));
            }
            if fetched >= limit {
                tracing::warn!("Reached pagination limit of {} pages", limit);
                return Err(GitLabError::PageLimit { limit });
            }

            page = Self::list_page(client, query, Some(url)).await?;
            fetched += 1;
        }

        tracing::debug!(pages = fetched, "walked listing");
        Ok(acc)
    }
}
