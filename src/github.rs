use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::models::RepoSummary;

const USER_AGENT: &str = concat!("repo-history/", env!("CARGO_PKG_VERSION"));

/// Client for the upstream repository search API.
///
/// Only the first page the API returns is used; results keep upstream order.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct SearchReposResponse {
    items: Vec<RepoItem>,
}

#[derive(Deserialize)]
struct RepoItem {
    name: String,
    html_url: String,
    description: Option<String>,
    stargazers_count: Option<i64>,
}

impl From<RepoItem> for RepoSummary {
    fn from(item: RepoItem) -> Self {
        Self {
            name: item.name,
            url: item.html_url,
            description: item.description,
            star_count: item.stargazers_count,
        }
    }
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Search repositories matching `query`. Fails on transport errors,
    /// non-2xx statuses and bodies without an `items` list. Never retries.
    pub async fn search(&self, query: &str) -> Result<Vec<RepoSummary>> {
        let url = format!("{}/search/repositories", self.base_url);

        let mut req = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .context("Failed to call GitHub search API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GitHub search API returned {status}: {body}");
        }

        let body: SearchReposResponse = resp
            .json()
            .await
            .context("Failed to parse GitHub search response")?;

        tracing::debug!("GitHub returned {} repos for '{query}'", body.items.len());

        Ok(body.items.into_iter().map(RepoSummary::from).collect())
    }
}
