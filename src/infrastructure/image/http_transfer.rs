//! HTTP transfer adapter for image bytes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::errors::TransferError;
use crate::domain::ports::ImageTransferPort;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("reviewfeed/", env!("CARGO_PKG_VERSION"));

/// Fetches image bytes over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpImageTransfer {
    client: Client,
}

impl HttpImageTransfer {
    /// Creates a transfer with the given request timeout.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> Result<Self, TransferError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransferError::request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageTransferPort for HttpImageTransfer {
    async fn transfer(&self, url: &str) -> Result<Bytes, TransferError> {
        debug!(url, "Downloading image");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, "Image request failed");
            if e.is_timeout() {
                TransferError::Timeout
            } else {
                TransferError::request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status {
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| TransferError::body(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpImageTransfer::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_transfer_error() {
        let transfer = HttpImageTransfer::new(Duration::from_secs(1)).unwrap();

        let result = transfer.transfer("not a url").await;

        assert!(matches!(result, Err(TransferError::Request { .. })));
    }
}
