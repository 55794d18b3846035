//! Domain entity definitions.

mod image;
mod review;

pub use image::{DecodedImage, ImageKey};
pub use review::{MAX_RATING, Review, ReviewsPage};
