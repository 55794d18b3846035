//! Review feed error types.

use thiserror::Error;

/// Review feed error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum FeedError {
    #[error("reviews provider failed: {message}")]
    Provider { message: String },

    #[error("malformed reviews payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("reviews source unavailable: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedError {
    /// Creates provider error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Io(_))
    }
}
