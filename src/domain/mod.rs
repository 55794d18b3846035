//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{DecodedImage, ImageKey, Review, ReviewsPage};
pub use errors::{FeedError, ImageError};
pub use ports::{ImageLoaderPort, ReviewsPort};
