//! Reviews source port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FeedError;

/// Port for fetching raw review pages.
///
/// The payload is a JSON-encoded `ReviewsPage`; decoding belongs to the feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewsPort: Send + Sync {
    /// Fetches up to `limit` reviews starting at `offset`.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Bytes, FeedError>;
}
