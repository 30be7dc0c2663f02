use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::links::parse_link_header;
use crate::domain::error::TrackerError;
use crate::domain::models::{GitHubConfig, Issue, RepoSlug};
use crate::domain::ports::{IssuePage, IssueTracker};
use crate::infrastructure::logging::SecretScrubber;

/// Configuration for the GitHub REST client
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Personal access token
    pub token: String,

    /// Base URL of the REST API
    pub api_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        let defaults = GitHubConfig::default();
        Self {
            token: String::new(),
            api_url: defaults.api_url,
            timeout_secs: defaults.timeout_secs,
        }
    }
}

impl From<&GitHubConfig> for GitHubClientConfig {
    fn from(config: &GitHubConfig) -> Self {
        Self {
            token: config.token.clone(),
            api_url: config.api_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// GitHub REST API adapter for the [`IssueTracker`] port
///
/// Wraps one pooled `reqwest::Client`; cheap to share behind an `Arc`
/// across concurrent reconciliations.
pub struct GitHubClient {
    http_client: ReqwestClient,
    token: String,
    api_url: String,
    scrubber: SecretScrubber,
}

#[derive(Deserialize)]
struct AuthenticatedUser {
    login: String,
}

impl GitHubClient {
    /// Create a client for the public GitHub API
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_config(GitHubClientConfig {
            token: token.into(),
            ..Default::default()
        })
    }

    pub fn with_config(config: GitHubClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ghia/", env!("CARGO_PKG_VERSION"))),
        );

        let http_client = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            token: config.token,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            scrubber: SecretScrubber::new(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("token {}", self.token))
    }

    /// Send a request, turning non-2xx responses into `TrackerError::Status`
    async fn send(&self, request: RequestBuilder) -> Result<Response, TrackerError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| TrackerError::Transport(self.scrubber.scrub_message(&e.to_string())))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());
        Err(TrackerError::Status {
            status: status.as_u16(),
            body: self.scrubber.scrub_message(&body),
        })
    }

    async fn patch_issue(&self, issue: &Issue, body: serde_json::Value) -> Result<(), TrackerError> {
        debug!(url = %issue.url, %body, "patching issue");
        self.send(self.http_client.patch(&issue.url).json(&body))
            .await
            .map(drop)
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    fn issues_url(&self, repo: &RepoSlug) -> String {
        format!("{}/repos/{}/{}/issues", self.api_url, repo.owner(), repo.name())
    }

    async fn fetch_issue_page(&self, url: &str) -> Result<IssuePage, TrackerError> {
        let response = self.send(self.http_client.get(url)).await?;

        let links = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        let issues: Vec<Issue> = response
            .json()
            .await
            .map_err(|e| TrackerError::Decode(e.to_string()))?;

        Ok(IssuePage { issues, links })
    }

    async fn update_assignees(&self, issue: &Issue, assignees: &[String]) -> Result<(), TrackerError> {
        self.patch_issue(issue, json!({ "assignees": assignees })).await
    }

    async fn update_labels(&self, issue: &Issue, labels: &[String]) -> Result<(), TrackerError> {
        self.patch_issue(issue, json!({ "labels": labels })).await
    }

    async fn current_login(&self) -> Result<String, TrackerError> {
        let url = format!("{}/user", self.api_url);
        let user: AuthenticatedUser = self
            .send(self.http_client.get(url))
            .await?
            .json()
            .await
            .map_err(|e| TrackerError::Decode(e.to_string()))?;
        Ok(user.login)
    }
}
