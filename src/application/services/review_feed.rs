//! Paginated review feed.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dto::{COLLAPSED_LINES, FeedItem, ReviewItem, TotalCountItem};
use crate::domain::entities::{Review, ReviewsPage};
use crate::domain::errors::FeedError;
use crate::domain::ports::ReviewsPort;

use super::rating_renderer::RatingRenderer;

/// Default number of reviews per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default look-ahead, in viewport heights, for loading the next page.
pub const DEFAULT_PRELOAD_SCREENS: f64 = 2.5;

/// Pagination state.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Rows loaded so far.
    pub items: Vec<FeedItem>,
    /// Page size.
    pub limit: usize,
    /// Offset of the next page.
    pub offset: usize,
    /// Whether another page may be requested.
    pub should_load: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl FeedState {
    /// Creates an empty state with the given page size.
    #[must_use]
    pub fn with_page_size(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            limit: limit.max(1),
            offset: 0,
            should_load: true,
        }
    }
}

/// Result of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoad {
    /// Nothing requested: the previous request is unresolved or every page is loaded.
    Skipped,
    /// A page was appended.
    Loaded {
        /// Reviews added by this page.
        added: usize,
        /// True if this was the last page.
        exhausted: bool,
    },
}

/// Review list view model: pagination, row construction, text expansion.
pub struct ReviewFeed {
    state: FeedState,
    provider: Arc<dyn ReviewsPort>,
    ratings: RatingRenderer,
}

impl ReviewFeed {
    /// Creates a feed over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn ReviewsPort>, state: FeedState) -> Self {
        Self {
            state,
            provider,
            ratings: RatingRenderer::new(),
        }
    }

    /// Current rows.
    #[must_use]
    pub fn items(&self) -> &[FeedItem] {
        &self.state.items
    }

    /// Current pagination state.
    #[must_use]
    pub const fn state(&self) -> &FeedState {
        &self.state
    }

    /// Returns true if another page may be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.state.should_load
    }

    /// Requests the next page.
    ///
    /// The first page replaces existing rows; later pages append. After the
    /// last page a total-count footer is added.
    ///
    /// # Errors
    /// Returns error if the provider fails or the payload is malformed. The
    /// feed stays as it was and the same page can be requested again.
    pub async fn load_next_page(&mut self) -> Result<PageLoad, FeedError> {
        if !self.state.should_load {
            return Ok(PageLoad::Skipped);
        }
        self.state.should_load = false;

        let (offset, limit) = (self.state.offset, self.state.limit);
        debug!(offset, limit, "Loading reviews page");

        let page = match self.fetch_page(offset, limit).await {
            Ok(page) => page,
            Err(e) => {
                warn!(offset, error = %e, "Failed to load reviews page");
                self.state.should_load = true;
                return Err(e);
            }
        };

        let added = page.items.len();
        let items: Vec<FeedItem> = page
            .items
            .iter()
            .map(|review| FeedItem::Review(self.make_review_item(review)))
            .collect();

        if offset == 0 {
            self.state.items = items;
        } else {
            self.state.items.extend(items);
        }

        self.state.offset += limit;
        self.state.should_load = (self.state.offset as u64) < page.count;

        if !self.state.should_load {
            self.state
                .items
                .push(FeedItem::TotalCount(TotalCountItem::new(page.count)));
        }

        info!(
            added,
            total = page.count,
            exhausted = !self.state.should_load,
            "Reviews page loaded"
        );

        Ok(PageLoad::Loaded {
            added,
            exhausted: !self.state.should_load,
        })
    }

    /// Starts over from the first page.
    ///
    /// # Errors
    /// Returns error if the first page cannot be loaded.
    pub async fn refresh(&mut self) -> Result<PageLoad, FeedError> {
        self.state.offset = 0;
        self.state.should_load = true;
        self.load_next_page().await
    }

    /// Lifts the line limit of the review with `id`. Returns false if no such row exists.
    pub fn show_more(&mut self, id: Uuid) -> bool {
        let Some(item) = self.state.items.iter_mut().find_map(|item| match item {
            FeedItem::Review(review) if review.id == id => Some(review),
            _ => None,
        }) else {
            return false;
        };
        item.max_lines = 0;
        true
    }

    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<ReviewsPage, FeedError> {
        let raw = self.provider.fetch_page(offset, limit).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn make_review_item(&self, review: &Review) -> ReviewItem {
        ReviewItem {
            id: Uuid::new_v4(),
            user_name: review.full_name(),
            text: review.text.clone(),
            created: review.created.clone(),
            rating: self.ratings.render(review.rating).to_string(),
            avatar: review.avatar_key(),
            photos: review.photo_keys(),
            max_lines: COLLAPSED_LINES,
        }
    }
}

/// Returns true when the remaining content below the viewport is within
/// `screens` viewport heights of `target_offset`.
#[must_use]
pub fn should_load_next_page(
    viewport_height: f64,
    content_height: f64,
    target_offset: f64,
    screens: f64,
) -> bool {
    let trigger_distance = viewport_height * screens;
    let remaining_distance = content_height - viewport_height - target_offset;
    remaining_distance <= trigger_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Review;
    use crate::domain::ports::mocks::MockReviewsPort;
    use bytes::Bytes;
    use mockall::predicate::eq;
    use test_case::test_case;

    fn review(n: usize) -> Review {
        Review {
            first_name: format!("User{n}"),
            last_name: "Test".to_string(),
            avatar_url: Some(format!("https://example.com/avatars/{n}.png")),
            photos: None,
            text: format!("Review number {n}"),
            created: "1 May".to_string(),
            rating: 4,
        }
    }

    fn page_bytes(range: std::ops::Range<usize>, count: u64) -> Bytes {
        let page = ReviewsPage {
            items: range.map(review).collect(),
            count,
        };
        Bytes::from(serde_json::to_vec(&page).unwrap())
    }

    fn feed(provider: MockReviewsPort, page_size: usize) -> ReviewFeed {
        ReviewFeed::new(Arc::new(provider), FeedState::with_page_size(page_size))
    }

    fn review_names(feed: &ReviewFeed) -> Vec<String> {
        feed.items()
            .iter()
            .filter_map(FeedItem::as_review)
            .map(|item| item.user_name.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_first_page_sets_offset() {
        let mut provider = MockReviewsPort::new();
        provider
            .expect_fetch_page()
            .with(eq(0), eq(2))
            .times(1)
            .returning(|_, _| Ok(page_bytes(0..2, 5)));
        let mut feed = feed(provider, 2);

        let result = feed.load_next_page().await.unwrap();

        assert_eq!(
            result,
            PageLoad::Loaded {
                added: 2,
                exhausted: false
            }
        );
        assert_eq!(feed.state().offset, 2);
        assert!(feed.has_more());
        assert_eq!(review_names(&feed), vec!["User0 Test", "User1 Test"]);

        let first = feed.items()[0].as_review().unwrap();
        assert_eq!(first.rating, "★★★★☆");
        assert_eq!(first.max_lines, COLLAPSED_LINES);
        assert!(first.avatar.is_some());
    }

    #[tokio::test]
    async fn test_last_page_appends_total_count() {
        let mut provider = MockReviewsPort::new();
        provider
            .expect_fetch_page()
            .with(eq(0), eq(2))
            .returning(|_, _| Ok(page_bytes(0..2, 3)));
        provider
            .expect_fetch_page()
            .with(eq(2), eq(2))
            .returning(|_, _| Ok(page_bytes(2..3, 3)));
        let mut feed = feed(provider, 2);

        feed.load_next_page().await.unwrap();
        let result = feed.load_next_page().await.unwrap();

        assert_eq!(
            result,
            PageLoad::Loaded {
                added: 1,
                exhausted: true
            }
        );
        assert_eq!(feed.items().len(), 4);
        assert_eq!(
            feed.items().last(),
            Some(&FeedItem::TotalCount(TotalCountItem::new(3)))
        );
        assert_eq!(feed.load_next_page().await.unwrap(), PageLoad::Skipped);
    }

    #[tokio::test]
    async fn test_provider_error_allows_retry() {
        let mut provider = MockReviewsPort::new();
        provider
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Err(FeedError::provider("offline")));
        provider
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page_bytes(0..2, 2)));
        let mut feed = feed(provider, 2);

        let failed = feed.load_next_page().await;
        assert!(matches!(failed, Err(FeedError::Provider { .. })));
        assert!(feed.has_more());
        assert!(feed.items().is_empty());
        assert_eq!(feed.state().offset, 0);

        let retried = feed.load_next_page().await.unwrap();
        assert!(matches!(retried, PageLoad::Loaded { added: 2, .. }));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let mut provider = MockReviewsPort::new();
        provider
            .expect_fetch_page()
            .returning(|_, _| Ok(Bytes::from_static(b"{\"items\": 7}")));
        let mut feed = feed(provider, 20);

        let result = feed.load_next_page().await;

        assert!(matches!(result, Err(FeedError::Decode(_))));
        assert!(feed.has_more());
    }

    #[tokio::test]
    async fn test_refresh_replaces_items() {
        let mut provider = MockReviewsPort::new();
        provider
            .expect_fetch_page()
            .with(eq(0), eq(2))
            .times(2)
            .returning(|_, _| Ok(page_bytes(0..2, 4)));
        provider
            .expect_fetch_page()
            .with(eq(2), eq(2))
            .times(1)
            .returning(|_, _| Ok(page_bytes(2..4, 4)));
        let mut feed = feed(provider, 2);

        feed.load_next_page().await.unwrap();
        feed.load_next_page().await.unwrap();
        assert_eq!(feed.items().len(), 5);

        feed.refresh().await.unwrap();

        assert_eq!(review_names(&feed), vec!["User0 Test", "User1 Test"]);
        assert_eq!(feed.state().offset, 2);
        assert!(feed.has_more());
    }

    #[tokio::test]
    async fn test_show_more_expands_review() {
        let mut provider = MockReviewsPort::new();
        provider
            .expect_fetch_page()
            .returning(|_, _| Ok(page_bytes(0..2, 2)));
        let mut feed = feed(provider, 20);
        feed.load_next_page().await.unwrap();

        let id = feed.items()[1].as_review().unwrap().id;

        assert!(feed.show_more(id));
        assert_eq!(feed.items()[1].as_review().unwrap().max_lines, 0);
        assert_eq!(feed.items()[0].as_review().unwrap().max_lines, COLLAPSED_LINES);
        assert!(!feed.show_more(Uuid::new_v4()));
    }

    #[test_case(800.0, 10_000.0, 0.0, false ; "far_from_end")]
    #[test_case(800.0, 10_000.0, 7_000.0, false ; "just_outside_trigger")]
    #[test_case(800.0, 10_000.0, 7_200.0, true ; "exactly_at_trigger")]
    #[test_case(800.0, 10_000.0, 7_500.0, true ; "within_trigger")]
    #[test_case(800.0, 600.0, 0.0, true ; "content_shorter_than_viewport")]
    fn test_should_load_next_page(viewport: f64, content: f64, offset: f64, expected: bool) {
        assert_eq!(
            should_load_next_page(viewport, content, offset, DEFAULT_PRELOAD_SCREENS),
            expected
        );
    }
}
