//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with cost-bounded LRU eviction
//! - Deduplicated, cancellable async loading
//! - HTTP transfer and raster decode adapters

pub mod decoder;
pub mod http_transfer;
pub mod loader;
pub mod memory_cache;

pub use decoder::PixelDecoder;
pub use http_transfer::{DEFAULT_TIMEOUT_SECS, HttpImageTransfer};
pub use loader::{ImageLoader, ImageLoaderConfig};
pub use memory_cache::{CacheStats, DEFAULT_COST_LIMIT, MemoryImageCache};
