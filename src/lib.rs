//! Reviewfeed - a paginated review feed with a shared image loader.
//!
//! The image loader deduplicates concurrent requests for the same image,
//! keeps decoded images in a cost-bounded LRU cache and lets every caller
//! cancel its own wait without disturbing the others.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the feed service and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing rows and the listing.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "reviewfeed";
