//! Port definitions for image acquisition and caching.

use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::{DecodedImage, ImageKey};
use crate::domain::errors::{DecodeError, TransferError};

/// Port for fetching raw image bytes.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageTransferPort: Send + Sync {
    /// Fetches the bytes behind `url`.
    async fn transfer(&self, url: &str) -> Result<Bytes, TransferError>;
}

/// Port for turning raw bytes into a decoded image.
///
/// Decoding is CPU-bound; callers run it on the blocking pool.
pub trait ImageDecoderPort: Send + Sync {
    /// Decodes `bytes` into an image.
    ///
    /// # Errors
    /// Returns error if the bytes are not a supported image.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;
}

/// Port through which the presentation layer obtains images.
#[async_trait::async_trait]
pub trait ImageLoaderPort: Send + Sync {
    /// Returns the image for `key`, fetching it on a miss.
    /// Returns None if the image cannot be produced.
    async fn fetch(&self, key: &ImageKey) -> Option<Arc<DecodedImage>>;

    /// Like [`ImageLoaderPort::fetch`], but gives up as soon as `token` is cancelled.
    async fn fetch_cancellable(
        &self,
        key: &ImageKey,
        token: &CancellationToken,
    ) -> Option<Arc<DecodedImage>>;

    /// Returns the resident image for `key` without fetching.
    fn cached(&self, key: &ImageKey) -> Option<Arc<DecodedImage>>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use tokio::sync::Semaphore;

    /// Scripted transfer facility for tests.
    ///
    /// Each URL replays its queued responses in order; the last one repeats.
    /// Unknown URLs answer with HTTP 404.
    pub struct StubTransfer {
        responses: Mutex<HashMap<String, VecDeque<Result<Bytes, TransferError>>>>,
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
    }

    impl StubTransfer {
        /// Creates a transfer that answers immediately.
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        /// Creates a transfer that holds every request until a permit is added to the gate.
        pub fn gated() -> (Self, Arc<Semaphore>) {
            let gate = Arc::new(Semaphore::new(0));
            let transfer = Self {
                gate: Some(gate.clone()),
                ..Self::new()
            };
            (transfer, gate)
        }

        /// Queues a successful response.
        pub fn respond(self, url: &str, body: &[u8]) -> Self {
            self.push(url, Ok(Bytes::copy_from_slice(body)))
        }

        /// Queues a failed response.
        pub fn fail(self, url: &str) -> Self {
            self.push(url, Err(TransferError::Status { status: 503 }))
        }

        fn push(self, url: &str, response: Result<Bytes, TransferError>) -> Self {
            self.responses
                .lock()
                .entry(url.to_string())
                .or_default()
                .push_back(response);
            self
        }

        /// Number of transfers started so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Default for StubTransfer {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait::async_trait]
    impl ImageTransferPort for StubTransfer {
        async fn transfer(&self, url: &str) -> Result<Bytes, TransferError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(gate) = &self.gate {
                gate.acquire()
                    .await
                    .map_err(|e| TransferError::request(e.to_string()))?
                    .forget();
            }

            let mut responses = self.responses.lock();
            match responses.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue
                    .pop_front()
                    .unwrap_or(Err(TransferError::Status { status: 404 })),
                Some(queue) => queue
                    .front()
                    .cloned()
                    .unwrap_or(Err(TransferError::Status { status: 404 })),
                None => Err(TransferError::Status { status: 404 }),
            }
        }
    }

    /// Decoder whose output cost equals the input length.
    ///
    /// Empty input or input starting with `!` is undecodable; the literal
    /// `vector` decodes to an image without a pixel buffer.
    pub struct StubDecoder;

    impl ImageDecoderPort for StubDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
            match bytes {
                [] | [b'!', ..] => Err(DecodeError::new("not an image")),
                b"vector" => Ok(DecodedImage::without_pixels(16, 16)),
                _ => Ok(DecodedImage::with_layout(1, 1, bytes.len())),
            }
        }
    }
}
