//! Abstraction over where feed payloads come from.

use std::future::Future;

use super::error::FeedError;
use super::types::FeedResponse;

/// Something that can produce the current feed payload.
///
/// Implemented by the HTTP [`FeedClient`](super::FeedClient) and by the
/// file-backed [`MockFeed`](super::MockFeed), so the poller can be driven
/// by either.
pub trait FeedSource: Send + Sync + 'static {
    /// Fetch the current payload.
    fn fetch(&self) -> impl Future<Output = Result<FeedResponse, FeedError>> + Send;
}
