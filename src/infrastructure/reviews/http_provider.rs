//! Reviews endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::errors::FeedError;
use crate::domain::ports::ReviewsPort;

/// Fetches review pages from an HTTP endpoint using `offset`/`limit` query parameters.
pub struct HttpReviewsProvider {
    client: Client,
    endpoint: String,
}

impl HttpReviewsProvider {
    /// Creates a provider for `endpoint`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::provider(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ReviewsPort for HttpReviewsProvider {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Bytes, FeedError> {
        debug!(endpoint = %self.endpoint, offset, limit, "Requesting reviews page");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Reviews request failed");
                FeedError::provider(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::provider(format!("HTTP {status}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| FeedError::provider(format!("failed to read body: {e}")))
    }
}
