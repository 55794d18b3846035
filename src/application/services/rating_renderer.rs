//! Star rating rendering.

use crate::domain::entities::MAX_RATING;

const FILLED: char = '★';
const EMPTY: char = '☆';

/// Renders ratings as a row of filled and empty stars.
///
/// All six possible labels are built up front and shared.
#[derive(Debug, Clone)]
pub struct RatingRenderer {
    labels: Vec<String>,
}

impl RatingRenderer {
    /// Creates a renderer.
    #[must_use]
    pub fn new() -> Self {
        let max = usize::from(MAX_RATING);
        let labels = (0..=max)
            .map(|filled| {
                std::iter::repeat_n(FILLED, filled)
                    .chain(std::iter::repeat_n(EMPTY, max - filled))
                    .collect()
            })
            .collect();
        Self { labels }
    }

    /// Returns the label for `rating`, clamped to `0..=5`.
    #[must_use]
    pub fn render(&self, rating: u8) -> &str {
        &self.labels[usize::from(rating.min(MAX_RATING))]
    }
}

impl Default for RatingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "☆☆☆☆☆" ; "zero")]
    #[test_case(3, "★★★☆☆" ; "three")]
    #[test_case(5, "★★★★★" ; "five")]
    #[test_case(9, "★★★★★" ; "clamped")]
    fn test_render(rating: u8, expected: &str) {
        assert_eq!(RatingRenderer::new().render(rating), expected);
    }
}
