//! Async image loading orchestrator.
//!
//! Memory cache first, then network. Concurrent requests for the same key
//! share one transfer: the first caller spawns it, later callers wait on its
//! outcome. A caller may withdraw at any time; when the last one does, the
//! transfer is aborted.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{DecodedImage, ImageKey};
use crate::domain::errors::{DecodeError, ImageError};
use crate::domain::ports::{ImageDecoderPort, ImageLoaderPort, ImageTransferPort};

use super::memory_cache::{CacheStats, DEFAULT_COST_LIMIT, MemoryImageCache};

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Memory budget in bytes.
    pub cost_limit: usize,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            cost_limit: DEFAULT_COST_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
enum Completion {
    Pending,
    Done(Option<Arc<DecodedImage>>),
}

impl Completion {
    const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    fn image(&self) -> Option<Arc<DecodedImage>> {
        match self {
            Self::Pending => None,
            Self::Done(image) => image.clone(),
        }
    }
}

struct InFlight {
    generation: u64,
    outcome: watch::Receiver<Completion>,
    waiters: usize,
    task: AbortHandle,
}

struct LoaderState {
    cache: MemoryImageCache,
    in_flight: HashMap<ImageKey, InFlight>,
    next_generation: u64,
}

struct LoaderShared {
    state: Mutex<LoaderState>,
    transfer: Arc<dyn ImageTransferPort>,
    decoder: Arc<dyn ImageDecoderPort>,
}

enum Join {
    Hit(Arc<DecodedImage>),
    Wait(Waiter),
}

/// Shared, deduplicating image loader with a cost-bounded memory cache.
///
/// Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct ImageLoader {
    shared: Arc<LoaderShared>,
    config: ImageLoaderConfig,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a new image loader over the given transfer and decode facilities.
    #[must_use]
    pub fn new(
        config: ImageLoaderConfig,
        transfer: Arc<dyn ImageTransferPort>,
        decoder: Arc<dyn ImageDecoderPort>,
    ) -> Self {
        let state = LoaderState {
            cache: MemoryImageCache::new(config.cost_limit),
            in_flight: HashMap::new(),
            next_generation: 0,
        };

        Self {
            shared: Arc::new(LoaderShared {
                state: Mutex::new(state),
                transfer,
                decoder,
            }),
            config,
        }
    }

    /// Loads an image, checking the memory cache first.
    ///
    /// A cache hit completes without suspending. Failures are logged and
    /// reported as None; nothing is cached for them.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn fetch(&self, key: &ImageKey) -> Option<Arc<DecodedImage>> {
        match self.join(key) {
            Join::Hit(image) => Some(image),
            Join::Wait(waiter) => waiter.wait().await,
        }
    }

    /// Loads an image, giving up when `token` is cancelled.
    ///
    /// Cancelling only withdraws this caller. Other callers waiting on the
    /// same key still receive the result.
    pub async fn fetch_cancellable(
        &self,
        key: &ImageKey,
        token: &CancellationToken,
    ) -> Option<Arc<DecodedImage>> {
        if token.is_cancelled() {
            return None;
        }

        match self.join(key) {
            Join::Hit(image) => Some(image),
            Join::Wait(waiter) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(key = %key, "Image request cancelled");
                        None
                    }
                    image = waiter.wait() => image,
                }
            }
        }
    }

    /// Returns the resident image without fetching or promoting it.
    #[must_use]
    pub fn cached(&self, key: &ImageKey) -> Option<Arc<DecodedImage>> {
        self.shared.state.lock().cache.peek(key)
    }

    /// Starts loading an image in the background.
    pub fn prefetch(&self, key: ImageKey) {
        if self.cached(&key).is_some() {
            return;
        }
        let loader = self.clone();
        tokio::spawn(async move {
            let _ = loader.fetch(&key).await;
        });
    }

    /// Prefetches multiple images into cache.
    pub fn prefetch_batch(&self, keys: impl IntoIterator<Item = ImageKey>) {
        for key in keys {
            self.prefetch(key);
        }
    }

    /// Returns true if a transfer for `key` is outstanding.
    #[must_use]
    pub fn is_loading(&self, key: &ImageKey) -> bool {
        self.shared.state.lock().in_flight.contains_key(key)
    }

    /// Returns the number of outstanding transfers.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.state.lock().in_flight.len()
    }

    /// Summed cost of resident images.
    #[must_use]
    pub fn current_cost(&self) -> usize {
        self.shared.state.lock().cache.current_cost()
    }

    /// Memory budget in bytes.
    #[must_use]
    pub const fn cost_limit(&self) -> usize {
        self.config.cost_limit
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.shared.state.lock().cache.stats()
    }

    /// Drops all resident images. Outstanding transfers are left running.
    pub fn clear(&self) {
        self.shared.state.lock().cache.clear();
        info!("Cleared image cache");
    }

    fn join(&self, key: &ImageKey) -> Join {
        let mut state = self.shared.state.lock();

        if let Some(image) = state.cache.get(key) {
            return Join::Hit(image);
        }

        if let Some(flight) = state.in_flight.get_mut(key) {
            flight.waiters += 1;
            trace!(key = %key, waiters = flight.waiters, "Joining in-flight transfer");
            return Join::Wait(Waiter {
                shared: self.shared.clone(),
                key: key.clone(),
                generation: flight.generation,
                outcome: flight.outcome.clone(),
            });
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        let (tx, rx) = watch::channel(Completion::Pending);
        let task = tokio::spawn(run_transfer(
            self.shared.clone(),
            key.clone(),
            generation,
            tx,
        ));

        debug!(key = %key, "Starting image transfer");
        state.in_flight.insert(
            key.clone(),
            InFlight {
                generation,
                outcome: rx.clone(),
                waiters: 1,
                task: task.abort_handle(),
            },
        );

        Join::Wait(Waiter {
            shared: self.shared.clone(),
            key: key.clone(),
            generation,
            outcome: rx,
        })
    }
}

#[async_trait::async_trait]
impl ImageLoaderPort for ImageLoader {
    async fn fetch(&self, key: &ImageKey) -> Option<Arc<DecodedImage>> {
        Self::fetch(self, key).await
    }

    async fn fetch_cancellable(
        &self,
        key: &ImageKey,
        token: &CancellationToken,
    ) -> Option<Arc<DecodedImage>> {
        Self::fetch_cancellable(self, key, token).await
    }

    fn cached(&self, key: &ImageKey) -> Option<Arc<DecodedImage>> {
        Self::cached(self, key)
    }
}

/// Owner side of an in-flight key: transfer, decode, publish.
async fn run_transfer(
    shared: Arc<LoaderShared>,
    key: ImageKey,
    generation: u64,
    tx: watch::Sender<Completion>,
) {
    let image = match load(&shared, &key).await {
        Ok(image) => {
            debug!(
                key = %key,
                width = image.width(),
                height = image.height(),
                "Image loaded successfully"
            );
            Some(Arc::new(image))
        }
        Err(e) => {
            let stage = if e.is_transfer() { "transfer" } else { "decode" };
            warn!(key = %key, stage, error = %e, "Failed to load image");
            None
        }
    };

    {
        let mut state = shared.state.lock();
        if state
            .in_flight
            .get(&key)
            .is_some_and(|flight| flight.generation == generation)
        {
            state.in_flight.remove(&key);
        }
        if let Some(image) = &image {
            let evicted = state.cache.insert(key.clone(), image.clone());
            if !evicted.is_empty() {
                debug!(
                    key = %key,
                    evicted = evicted.len(),
                    cost = state.cache.current_cost(),
                    "Made room for image"
                );
            }
        }
    }

    tx.send_replace(Completion::Done(image));
}

async fn load(shared: &LoaderShared, key: &ImageKey) -> Result<DecodedImage, ImageError> {
    let bytes = shared.transfer.transfer(key.as_str()).await?;
    trace!(key = %key, len = bytes.len(), "Transfer complete, decoding");

    let decoder = shared.decoder.clone();
    let decoded = tokio::task::spawn_blocking(move || decoder.decode(&bytes))
        .await
        .map_err(|e| DecodeError::new(format!("decode task panicked: {e}")))??;

    Ok(decoded)
}

/// One caller's interest in an in-flight key.
///
/// Dropping it withdraws the interest; the last withdrawal aborts the transfer.
struct Waiter {
    shared: Arc<LoaderShared>,
    key: ImageKey,
    generation: u64,
    outcome: watch::Receiver<Completion>,
}

impl Waiter {
    async fn wait(mut self) -> Option<Arc<DecodedImage>> {
        // The sender only disappears without a value if the task was aborted.
        let image = match self.outcome.wait_for(Completion::is_done).await {
            Ok(completion) => completion.image(),
            Err(_) => None,
        };
        image
    }
}

impl Drop for Waiter {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        let Some(flight) = state.in_flight.get_mut(&self.key) else {
            return;
        };
        if flight.generation != self.generation {
            return;
        }

        flight.waiters = flight.waiters.saturating_sub(1);
        if flight.waiters == 0
            && let Some(orphan) = state.in_flight.remove(&self.key)
        {
            orphan.task.abort();
            debug!(key = %self.key, "Aborted orphaned image transfer");
        }
    }
}
