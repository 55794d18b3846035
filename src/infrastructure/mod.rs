//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (caching, loading, transfer, decode).
pub mod image;
/// Review sources.
pub mod reviews;

pub use config::{AppConfig, CliArgs, ConfigError, ConfigStore, LogLevel};
pub use image::{
    CacheStats, HttpImageTransfer, ImageLoader, ImageLoaderConfig, MemoryImageCache, PixelDecoder,
};
pub use reviews::{FileReviewsProvider, HttpReviewsProvider};
