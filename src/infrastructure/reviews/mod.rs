//! Review sources.

pub mod file_provider;
pub mod http_provider;

pub use file_provider::FileReviewsProvider;
pub use http_provider::HttpReviewsProvider;
