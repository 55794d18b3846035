//! In-memory, cost-bounded LRU image cache.

use std::sync::Arc;

use lru::LruCache;
use tracing::{debug, trace};

use crate::domain::entities::{DecodedImage, ImageKey};

/// Default memory budget: 50 MiB.
pub const DEFAULT_COST_LIMIT: usize = 50 * 1024 * 1024;

struct CacheEntry {
    image: Arc<DecodedImage>,
    cost: usize,
}

/// LRU cache for decoded images, bounded by the summed cost of its entries.
///
/// Not synchronized; the loader keeps it behind its state lock.
/// Inserting evicts least-recently-used entries until the new one fits. An
/// entry larger than the whole budget is still admitted, alone.
pub struct MemoryImageCache {
    entries: LruCache<ImageKey, CacheEntry>,
    current_cost: usize,
    cost_limit: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl MemoryImageCache {
    /// Creates a new cache with the given cost budget in bytes.
    #[must_use]
    pub fn new(cost_limit: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            current_cost: 0,
            cost_limit,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Creates a new cache with the default budget.
    #[must_use]
    pub fn with_default_limit() -> Self {
        Self::new(DEFAULT_COST_LIMIT)
    }

    /// Returns an image and marks it most recently used.
    pub fn get(&mut self, key: &ImageKey) -> Option<Arc<DecodedImage>> {
        if let Some(entry) = self.entries.get(key) {
            self.hits += 1;
            trace!(key = %key, "Memory cache hit");
            Some(entry.image.clone())
        } else {
            self.misses += 1;
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    /// Peeks at an image without promoting it in the LRU.
    #[must_use]
    pub fn peek(&self, key: &ImageKey) -> Option<Arc<DecodedImage>> {
        self.entries.peek(key).map(|entry| entry.image.clone())
    }

    /// Stores an image, evicting as needed. Returns the evicted keys, oldest first.
    pub fn insert(&mut self, key: ImageKey, image: Arc<DecodedImage>) -> Vec<ImageKey> {
        let cost = image.cost();

        if let Some(previous) = self.entries.pop(&key) {
            self.current_cost -= previous.cost;
        }

        let mut evicted = Vec::new();
        while self.current_cost.saturating_add(cost) > self.cost_limit {
            let Some((old_key, old)) = self.entries.pop_lru() else {
                break;
            };
            self.current_cost -= old.cost;
            self.evictions += 1;
            debug!(key = %old_key, cost = old.cost, "Evicted image from memory cache");
            evicted.push(old_key);
        }

        debug!(key = %key, cost, "Storing image in memory cache");
        self.entries.put(key, CacheEntry { image, cost });
        self.current_cost += cost;

        evicted
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_cost = 0;
        debug!("Cleared memory image cache");
    }

    /// Number of resident images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Summed cost of resident images.
    #[must_use]
    pub const fn current_cost(&self) -> usize {
        self.current_cost
    }

    /// Configured budget.
    #[must_use]
    pub const fn cost_limit(&self) -> usize {
        self.cost_limit
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let hit_rate = if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate,
            size: self.len(),
            cost: self.current_cost,
            cost_limit: self.cost_limit,
        }
    }

    #[cfg(test)]
    fn recomputed_cost(&self) -> usize {
        self.entries.iter().map(|(_, entry)| entry.cost).sum()
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_limit()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries evicted to make room.
    pub evictions: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
    /// Summed cost of cached images.
    pub cost: usize,
    /// Cost budget.
    pub cost_limit: usize,
}

impl std::fmt::Display for CacheStats {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const MIB: f64 = 1024.0 * 1024.0;
        write!(
            f,
            "Cache: {} images, {:.1}/{:.1} MiB, {:.1}% hit rate ({} hits, {} misses, {} evicted)",
            self.size,
            self.cost as f64 / MIB,
            self.cost_limit as f64 / MIB,
            self.hit_rate,
            self.hits,
            self.misses,
            self.evictions
        )
    }
}
