//! Application services.

mod rating_renderer;
mod review_feed;

pub use rating_renderer::RatingRenderer;
pub use review_feed::{
    DEFAULT_PAGE_SIZE, DEFAULT_PRELOAD_SCREENS, FeedState, PageLoad, ReviewFeed,
    should_load_next_page,
};
