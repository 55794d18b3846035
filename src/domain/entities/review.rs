//! Review entities as delivered by the reviews endpoint.

use serde::{Deserialize, Serialize};

use super::ImageKey;

/// Highest rating a review can carry.
pub const MAX_RATING: u8 = 5;

/// A single user review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer first name.
    pub first_name: String,
    /// Reviewer last name.
    pub last_name: String,
    /// Avatar location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Attached photos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    /// Review body.
    pub text: String,
    /// Creation date as sent by the server.
    pub created: String,
    /// Star rating, `0..=5`.
    pub rating: u8,
}

impl Review {
    /// Returns "first last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the avatar as a cache key.
    #[must_use]
    pub fn avatar_key(&self) -> Option<ImageKey> {
        self.avatar_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(ImageKey::from)
    }

    /// Returns photo cache keys in display order.
    #[must_use]
    pub fn photo_keys(&self) -> Vec<ImageKey> {
        self.photos
            .iter()
            .flatten()
            .filter(|photo| !photo.is_empty())
            .map(|photo| ImageKey::from(photo.as_str()))
            .collect()
    }
}

/// One page of reviews plus the total number available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewsPage {
    /// Reviews on this page.
    pub items: Vec<Review>,
    /// Total reviews across all pages.
    pub count: u64,
}
