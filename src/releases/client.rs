//! GitHub release API client
//!
//! Fetches release metadata and asset listings from the GitHub REST API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::{Asset, Release};
use crate::config::{defaults, urls};
use crate::error::ReleaseError;

/// Client for the release hosting API
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    /// HTTP client
    client: reqwest::Client,
    /// API base URL (no trailing slash)
    api_url: String,
    /// Bearer credential, only sent to `api_url`
    token: Option<HeaderValue>,
}

impl ReleaseClient {
    /// Create a client for the public GitHub API
    pub fn new() -> Self {
        Self::with_api_url(urls::GITHUB_API, None)
    }

    /// Create a client for a custom API base URL, optionally authenticated
    pub fn with_api_url(api_url: &str, token: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(urls::GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(defaults::USER_AGENT));
        let token = token.filter(|t| !t.is_empty()).and_then(|token| {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    Some(value)
                }
                Err(_) => {
                    tracing::warn!("Ignoring GitHub token with invalid characters");
                    None
                }
            }
        });

        Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
                .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Get the API base URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// URL of a repository's release collection
    pub fn releases_url(&self, repo: &str) -> Result<String, ReleaseError> {
        validate_repo(repo)?;
        Ok(format!("{}/repos/{repo}/releases", self.api_url))
    }

    /// Fetch the latest published release
    pub async fn latest_release(&self, repo: &str) -> Result<Release, ReleaseError> {
        let url = format!("{}/latest", self.releases_url(repo)?);
        self.get_json(&url).await
    }

    /// Fetch the release for a tag
    pub async fn release_by_tag(&self, repo: &str, tag: &str) -> Result<Release, ReleaseError> {
        let url = format!("{}/tags/{tag}", self.releases_url(repo)?);
        self.get_json(&url).await
    }

    /// Fetch all releases, newest first
    pub async fn list_releases(&self, repo: &str) -> Result<Vec<Release>, ReleaseError> {
        let url = self.releases_url(repo)?;
        self.get_json(&url).await
    }

    /// Fetch the asset list behind a release's `assets_url`
    ///
    /// The URL comes from the API payload; the token is withheld unless it
    /// points back at the API base.
    pub async fn list_assets(&self, assets_url: &str) -> Result<Vec<Asset>, ReleaseError> {
        self.get_json(assets_url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ReleaseError> {
        tracing::info!("fetching {url}");

        let mut request = self.client.get(url);
        if let Some(token) = self.token.as_ref().filter(|_| self.is_api_url(url)) {
            request = request.header(AUTHORIZATION, token.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ReleaseError::Network {
                url: url.to_string(),
                error: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ReleaseError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ReleaseError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ReleaseError::Network {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| ReleaseError::InvalidResponse {
            url: url.to_string(),
            error: e.to_string(),
        })
    }

    fn is_api_url(&self, url: &str) -> bool {
        url.strip_prefix(self.api_url.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

impl Default for ReleaseClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that a repository identifier looks like `owner/name`
pub fn validate_repo(repo: &str) -> Result<(), ReleaseError> {
    let mut parts = repo.split('/');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    );

    if valid {
        Ok(())
    } else {
        Err(ReleaseError::InvalidRepository {
            repo: repo.to_string(),
        })
    }
}
