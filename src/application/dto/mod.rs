//! Data transfer objects.

mod feed_item;

pub use feed_item::{COLLAPSED_LINES, FeedItem, ReviewItem, TotalCountItem};
