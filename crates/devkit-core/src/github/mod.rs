//! Hosted code service API client.
//!
//! Covers the few calls the chores need: the authenticated user's login
//! (the default owner for bare project names), repository topics and
//! release creation.

use anyhow::Context;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::GITHUB_TOKEN_ENV;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// A created release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Topics {
    names: Vec<String>,
}

/// Existing topics followed by any new ones not already present.
pub fn merge_topics(existing: &[String], added: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for topic in added {
        if !merged.contains(topic) {
            merged.push(topic.clone());
        }
    }
    merged
}

/// Authenticated API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_base: Url,
    token: String,
    http: reqwest::Client,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: impl Into<String>) -> anyhow::Result<Self> {
        let base = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{}/", api_base)
        };
        let api_base =
            Url::parse(&base).with_context(|| format!("Invalid API URL: {}", api_base))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("devkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_base,
            token: token.into(),
            http,
        })
    }

    /// Build a client from a token that may be missing.
    pub fn with_token(api_base: &str, token: Option<&str>) -> anyhow::Result<Self> {
        let token = token.ok_or_else(|| {
            anyhow::anyhow!("API token not available; set {}", GITHUB_TOKEN_ENV)
        })?;
        Self::new(api_base, token)
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Absolute URL for an API path like `repos/org/repo/releases`.
    pub fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        self.api_base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid API path: {}", path))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(ACCEPT, ACCEPT_V3)
            .header(AUTHORIZATION, format!("token {}", self.token))
    }

    /// Login of the authenticated user.
    pub async fn username(&self) -> anyhow::Result<String> {
        let url = self.endpoint("user")?;
        let response = self
            .request(reqwest::Method::GET, url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to query {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to look up user: HTTP {} from {}", response.status(), url);
        }

        let user: User = response
            .json()
            .await
            .context("Failed to parse user response")?;
        Ok(user.login)
    }

    /// Topics currently set on `repo` (`owner/name`).
    pub async fn topics(&self, repo: &str) -> anyhow::Result<Vec<String>> {
        let url = self.endpoint(&format!("repos/{}/topics", repo))?;
        let response = self
            .request(reqwest::Method::GET, url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to query {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to get topics for {}: HTTP {}", repo, response.status());
        }

        let topics: Topics = response
            .json()
            .await
            .context("Failed to parse topics response")?;
        Ok(topics.names)
    }

    /// Replace the topics on `repo`.
    pub async fn replace_topics(&self, repo: &str, names: &[String]) -> anyhow::Result<()> {
        let url = self.endpoint(&format!("repos/{}/topics", repo))?;
        let body = Topics {
            names: names.to_vec(),
        };
        let response = self
            .request(reqwest::Method::PUT, url.clone())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to put topics to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Failed to set topics for {}: HTTP {} ({})",
                repo,
                status,
                body.trim()
            );
        }
        Ok(())
    }

    /// Add topics to `repo`, keeping the ones already set.
    ///
    /// Returns the resulting topic list.
    pub async fn add_topics(&self, repo: &str, topics: &[String]) -> anyhow::Result<Vec<String>> {
        let existing = self.topics(repo).await?;
        let merged = merge_topics(&existing, topics);
        if merged.len() != existing.len() {
            tracing::info!(repo, topics = ?topics, "Adding topics");
            self.replace_topics(repo, &merged).await?;
        }
        Ok(merged)
    }

    /// Create a release for `repo` (`owner/name`) at `tag`.
    pub async fn create_release(&self, repo: &str, tag: &str) -> anyhow::Result<Release> {
        let url = self.endpoint(&format!("repos/{}/releases", repo))?;
        tracing::info!(repo, tag, "Creating release");
        let response = self
            .request(reqwest::Method::POST, url.clone())
            .json(&serde_json::json!({ "tag_name": tag }))
            .send()
            .await
            .with_context(|| format!("Failed to post release to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Failed to create release {} for {}: HTTP {} ({})",
                tag,
                repo,
                status,
                body.trim()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse release response")
    }
}
