//! Reviews served from a local JSON document.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::entities::ReviewsPage;
use crate::domain::errors::FeedError;
use crate::domain::ports::ReviewsPort;

/// Pages through a `ReviewsPage` JSON file holding every review.
///
/// The file is read once; each request returns the requested slice with the
/// document's total `count`.
pub struct FileReviewsProvider {
    path: PathBuf,
    document: OnceCell<ReviewsPage>,
}

impl FileReviewsProvider {
    /// Creates a provider for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: OnceCell::new(),
        }
    }

    async fn document(&self) -> Result<&ReviewsPage, FeedError> {
        self.document
            .get_or_try_init(|| async {
                debug!(path = %self.path.display(), "Reading reviews file");
                let raw = tokio::fs::read(&self.path).await?;
                Ok::<_, FeedError>(serde_json::from_slice(&raw)?)
            })
            .await
    }
}

#[async_trait]
impl ReviewsPort for FileReviewsProvider {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Bytes, FeedError> {
        let document = self.document().await?;

        let items = document
            .items
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        let page = ReviewsPage {
            items,
            count: document.count,
        };

        Ok(Bytes::from(serde_json::to_vec(&page)?))
    }
}
