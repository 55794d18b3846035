//! Application layer with the review feed and its DTOs.

/// Data transfer objects.
pub mod dto;
/// Application services.
pub mod services;

pub use dto::{FeedItem, ReviewItem, TotalCountItem};
pub use services::{FeedState, PageLoad, RatingRenderer, ReviewFeed};
