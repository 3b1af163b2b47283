use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_USER_AGENT: &str = "kg-pipeline/0.1";

#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
    user_agent: String,
}

impl Fetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            user_agent: user_agent.into(),
        }
    }

    pub fn default() -> Self {
        Self::new(Duration::from_secs(30), DEFAULT_USER_AGENT)
    }

    /// Fetch a URL and return the decoded body text.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("Fetching {url} failed: {}", response.status());
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to decode response body from {url}"))
    }
}
