//! Tag creation.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::GitLabClient;
use crate::error::{GitLabError, Result};

/// Page size sent along with tag creation.
const TAG_PAGE_SIZE: u32 = 100;

/// Body of a tag-creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagCreateParams {
    /// Name of the new tag.
    pub tag_name: String,

    /// Commit id (or branch name) the tag points at.
    #[serde(rename = "ref")]
    pub git_ref: String,

    /// Annotation message. Without it GitLab creates a lightweight tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TagCreateParams {
    /// Lightweight tag `tag_name` on `commit_id`.
    #[must_use]
    pub fn new(tag_name: &str, commit_id: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            git_ref: commit_id.to_string(),
            message: None,
        }
    }

    /// Annotate the tag with `message`.
    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

#[derive(Serialize)]
struct TagQuery {
    per_page: u32,
}

/// Tag `commit_id` of the project named `project_name` as `tag_name`.
///
/// # Errors
///
/// Fails if the project cannot be resolved, on transport errors, and when
/// the server answers anything but `201 Created`; in the last case the
/// error carries the response body verbatim.
pub async fn create_tag(
    client: &GitLabClient,
    project_name: &str,
    commit_id: &str,
    tag_name: &str,
) -> Result<()> {
    let project_id = super::resolve_project_id(client, project_name).await?;
    create_tag_with(client, project_id, &TagCreateParams::new(tag_name, commit_id)).await
}

/// Create a tag in a project given by id.
///
/// Single attempt; an existing tag of the same name is reported by the
/// server and passed through as [`GitLabError::Remote`].
#[tracing::instrument(skip(client))]
pub async fn create_tag_with(
    client: &GitLabClient,
    project_id: u64,
    params: &TagCreateParams,
) -> Result<()> {
    let path = format!("projects/{project_id}/repository/tags");
    let query = TagQuery {
        per_page: TAG_PAGE_SIZE,
    };

    let response = client.post(&path, &query, params).await?;
    let status = response.status();
    let body = response.text().await.map_err(GitLabError::HttpError)?;

    if status != StatusCode::CREATED {
        tracing::debug!(status = status.as_u16(), "tag creation rejected");
        return Err(GitLabError::Remote(body));
    }

    tracing::info!(project_id, tag = %params.tag_name, "created tag");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_body() {
        let body = serde_json::to_value(TagCreateParams::new("v12", "bcd3098b")).unwrap();
        assert_eq!(body, serde_json::json!({"tag_name": "v12", "ref": "bcd3098b"}));
    }

    #[test]
    fn test_annotated_params_body() {
        let params = TagCreateParams::new("v12", "bcd3098b").with_message("Build 12");
        let body = serde_json::to_value(params).unwrap();
        assert_eq!(body["message"], "Build 12");
    }
}
