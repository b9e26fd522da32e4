use std::time::Duration;

use anyhow::{Context, Result};
use artifact_fetch_core::{models::ArtifactPage, pipeline::ArtifactSource};
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderName;
use http_body_util::BodyExt;
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};

/// REST API version pinned on every request.
pub const API_VERSION: &str = "2022-11-28";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
// Archive downloads can be large, so reads get a generous bound.
const READ_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct GitHub {
    pub client: Octocrab,
}

#[derive(serde::Serialize)]
struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
}

impl GitHub {
    /// Create a client for `api_url`, or for api.github.com when it is `None`.
    pub fn new(token: &str, api_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .personal_token(token.to_string())
            .add_header(HeaderName::from_static("x-github-api-version"), API_VERSION.to_string())
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(CONNECT_TIMEOUT))
            .set_read_timeout(Some(READ_TIMEOUT));
        if let Some(api_url) = api_url {
            builder = builder
                .base_uri(api_url)
                .with_context(|| format!("Invalid GitHub API URL '{api_url}'"))?;
        }
        let client = builder.build().context("Failed to create GitHub client")?;
        Ok(Self { client })
    }
}

pub fn artifacts_route(owner: &str, repo: &str) -> String {
    format!("/repos/{owner}/{repo}/actions/artifacts")
}

pub fn artifact_zip_route(owner: &str, repo: &str, artifact_id: u64) -> String {
    format!("{}/{artifact_id}/zip", artifacts_route(owner, repo))
}

#[async_trait]
impl ArtifactSource for GitHub {
    async fn list_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u8,
    ) -> Result<ArtifactPage> {
        self.client
            .get(
                artifacts_route(owner, repo),
                Some(&PageParams { per_page: Some(per_page), page: Some(page) }),
            )
            .await
            .with_context(|| format!("Failed to fetch artifacts page {page}"))
    }

    async fn download(&self, owner: &str, repo: &str, artifact_id: u64) -> Result<Bytes> {
        // `actions().download_artifact` hands back error bodies as archive data,
        // so the final status is checked here after following the redirect.
        let route = artifact_zip_route(owner, repo, artifact_id);
        let response = self.client._get(route.as_str()).await?;
        let response = self.client.follow_location_to_data(response).await?;
        let response = octocrab::map_github_error(response)
            .await
            .with_context(|| format!("GET {route} failed"))?;
        let bytes = response.into_body().collect().await?.to_bytes();
        tracing::debug!("Downloaded artifact {} ({} bytes)", artifact_id, bytes.len());
        Ok(bytes)
    }
}
