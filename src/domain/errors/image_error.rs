//! Image acquisition error types.

use thiserror::Error;

/// Failure while fetching raw image bytes.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum TransferError {
    #[error("request failed: {message}")]
    Request { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status: HTTP {status}")]
    Status { status: u16 },

    #[error("failed to read body: {message}")]
    Body { message: String },
}

impl TransferError {
    /// Creates request error.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Creates body error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body {
            message: message.into(),
        }
    }
}

/// Fetched bytes do not form a valid image.
#[derive(Debug, Clone, Error)]
#[error("failed to decode image: {message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Creates decode error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Any reason an image could not be produced for a key.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ImageError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ImageError {
    /// Returns whether the failure happened on the network side.
    #[must_use]
    pub const fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer(_))
    }
}
