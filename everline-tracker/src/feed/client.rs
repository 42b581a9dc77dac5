//! Everline feed HTTP client.
//!
//! Fetches the real-time train positions payload. The endpoint is public
//! and needs no authentication.

use std::time::Duration;

use super::error::FeedError;
use super::source::FeedSource;
use super::types::FeedResponse;

/// Default URL of the real-time train positions feed.
pub const DEFAULT_FEED_URL: &str = "https://everlinecu.com/api/api009.json";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Configuration for the feed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// URL of the JSON feed
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a config pointing at the production feed.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom feed URL (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for the Everline feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// The URL this client fetches.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the current feed payload.
    ///
    /// Only the envelope is validated here. Individual train records are
    /// left as raw JSON for per-record conversion.
    pub async fn fetch_feed(&self) -> Result<FeedResponse, FeedError> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<FeedResponse, FeedError> {
        self.fetch_feed().await
    }
}
