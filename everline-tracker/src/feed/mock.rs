//! Mock feed for running without network access.
//!
//! Loads a captured feed payload from a JSON file and serves it as if it
//! were the live response.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::FeedError;
use super::source::FeedSource;
use super::types::FeedResponse;

/// Feed source that serves a stored payload.
#[derive(Debug, Clone)]
pub struct MockFeed {
    response: Arc<RwLock<FeedResponse>>,
}

impl MockFeed {
    /// Load a payload from a JSON file in the feed's format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        Ok(Self::from_response(read_payload(path.as_ref())?))
    }

    /// Serve a payload already in memory.
    pub fn from_response(response: FeedResponse) -> Self {
        Self {
            response: Arc::new(RwLock::new(response)),
        }
    }

    /// Replace the payload served by subsequent fetches.
    pub async fn replace(&self, response: FeedResponse) {
        *self.response.write().await = response;
    }

    /// Reload the payload from disk (useful for development).
    pub async fn reload(&self, path: impl AsRef<Path>) -> Result<(), FeedError> {
        let response = read_payload(path.as_ref())?;
        self.replace(response).await;
        Ok(())
    }
}

impl FeedSource for MockFeed {
    async fn fetch(&self) -> Result<FeedResponse, FeedError> {
        Ok(self.response.read().await.clone())
    }
}

fn read_payload(path: &Path) -> Result<FeedResponse, FeedError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| FeedError::Mock(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&json)
        .map_err(|e| FeedError::Mock(format!("failed to parse {}: {e}", path.display())))
}
