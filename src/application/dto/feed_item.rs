//! Feed row data.

use uuid::Uuid;

use crate::domain::entities::ImageKey;

/// Lines of review text shown before "Show more".
pub const COLLAPSED_LINES: usize = 3;

/// Display data for one review row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    /// Row identity, stable across re-renders.
    pub id: Uuid,
    /// "First Last".
    pub user_name: String,
    /// Review body.
    pub text: String,
    /// Creation date label.
    pub created: String,
    /// Rendered rating.
    pub rating: String,
    /// Avatar image, if any.
    pub avatar: Option<ImageKey>,
    /// Photo strip images.
    pub photos: Vec<ImageKey>,
    /// Visible text lines; `0` means unlimited.
    pub max_lines: usize,
}

impl ReviewItem {
    /// Returns true if the text is collapsed and longer than the visible lines.
    #[must_use]
    pub fn can_expand(&self) -> bool {
        self.max_lines != 0 && self.text.lines().count() > self.max_lines
    }

    /// Returns the lines to show under the current `max_lines`.
    #[must_use]
    pub fn visible_lines(&self) -> Vec<&str> {
        let lines = self.text.lines();
        if self.max_lines == 0 {
            lines.collect()
        } else {
            lines.take(self.max_lines).collect()
        }
    }
}

/// Footer row with the total number of reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalCountItem {
    /// Label, e.g. "42 reviews".
    pub text: String,
}

impl TotalCountItem {
    /// Creates the footer for `count` reviews.
    #[must_use]
    pub fn new(count: u64) -> Self {
        let noun = if count == 1 { "review" } else { "reviews" };
        Self {
            text: format!("{count} {noun}"),
        }
    }
}

/// A row in the reviews list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedItem {
    /// A review.
    Review(ReviewItem),
    /// The closing total-count footer.
    TotalCount(TotalCountItem),
}

impl FeedItem {
    /// Returns the review, if this row is one.
    #[must_use]
    pub const fn as_review(&self) -> Option<&ReviewItem> {
        match self {
            Self::Review(item) => Some(item),
            Self::TotalCount(_) => None,
        }
    }
}
