//! GitHub REST API README client

use async_trait::async_trait;
use tracing::debug;

use crate::domain::summarizer::{GithubRepository, ReadmeSource};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const USER_AGENT: &str = concat!("api-key-dashboard/", env!("CARGO_PKG_VERSION"));

/// Fetches raw README content through the GitHub REST API
#[derive(Debug)]
pub struct GithubReadmeClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
    auth_header: Option<String>,
}

impl<C: HttpClientTrait> GithubReadmeClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_GITHUB_API_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_header: None,
        }
    }

    /// Authenticate requests to raise the API rate limit
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", token.into()));
        self
    }

    fn readme_url(&self, repository: &GithubRepository) -> String {
        format!(
            "{}/repos/{}/{}/readme",
            self.base_url, repository.owner, repository.repo
        )
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Accept", RAW_MEDIA_TYPE), ("User-Agent", USER_AGENT)];

        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }
}

#[async_trait]
impl<C: HttpClientTrait> ReadmeSource for GithubReadmeClient<C> {
    async fn fetch_readme(&self, repository: &GithubRepository) -> Result<String, DomainError> {
        let url = self.readme_url(repository);
        debug!(owner = %repository.owner, repo = %repository.repo, "Fetching README");

        let response = self
            .client
            .get_text(&url, self.headers())
            .await
            .map_err(|e| match e {
                DomainError::Provider { message, .. } => DomainError::provider("github", message),
                other => other,
            })?;

        match response.status {
            200..=299 => Ok(response.body),
            404 => Err(DomainError::not_found("README not found")),
            status => Err(DomainError::provider(
                "github",
                format!("GitHub API request failed with HTTP {}", status),
            )),
        }
    }
}
