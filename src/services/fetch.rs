// src/services/fetch.rs

//! Source document retrieval.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Credentials, WatcherConfig};

/// Fetches the raw source document over HTTP.
pub struct SourceFetcher {
    client: Client,
    url: String,
    token: Option<String>,
}

impl SourceFetcher {
    /// Create a fetcher with a configured HTTP client.
    pub fn new(config: &WatcherConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: credentials.source_url.clone(),
            token: credentials.source_token.clone(),
        })
    }

    /// The configured source URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the source document as text.
    ///
    /// A bearer token is attached when the source credential is present.
    /// Non-2xx responses are fetch errors; the caller aborts the cycle
    /// without touching persisted state.
    pub async fn fetch(&self) -> Result<String> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(self.url.as_str(), status));
        }

        Ok(response.text().await?)
    }
}
