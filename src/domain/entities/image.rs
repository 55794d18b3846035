//! Domain types for image handling.

/// Identifier of a cacheable image.
/// Holds the remote URL verbatim; equality and hashing use the whole string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Creates a new `ImageKey` from any string-like input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A decoded, ready-to-render image.
///
/// The pixel buffer is optional: decoders may hand back images whose pixels
/// live elsewhere (or nowhere, for vector and metadata-only sources). The
/// cache only looks at [`DecodedImage::cost`].
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    bytes_per_row: Option<usize>,
    pixels: Option<image::DynamicImage>,
}

impl DecodedImage {
    /// Wraps a decoded pixel buffer.
    #[must_use]
    pub fn from_pixels(pixels: image::DynamicImage) -> Self {
        let bytes_per_pixel = usize::from(pixels.color().bytes_per_pixel());
        let bytes_per_row = (pixels.width() as usize).saturating_mul(bytes_per_pixel);
        Self {
            width: pixels.width(),
            height: pixels.height(),
            bytes_per_row: Some(bytes_per_row),
            pixels: Some(pixels),
        }
    }

    /// Describes an image with a known row layout whose pixels are held elsewhere.
    #[must_use]
    pub const fn with_layout(width: u32, height: u32, bytes_per_row: usize) -> Self {
        Self {
            width,
            height,
            bytes_per_row: Some(bytes_per_row),
            pixels: None,
        }
    }

    /// Describes an image that exposes no addressable pixel buffer.
    #[must_use]
    pub const fn without_pixels(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes_per_row: None,
            pixels: None,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel row, if the image has an addressable buffer.
    #[must_use]
    pub const fn bytes_per_row(&self) -> Option<usize> {
        self.bytes_per_row
    }

    /// Decoded pixels, if held in memory.
    #[must_use]
    pub const fn pixels(&self) -> Option<&image::DynamicImage> {
        self.pixels.as_ref()
    }

    /// Memory cost used for cache budgeting.
    ///
    /// `bytes_per_row * height`, falling back to `1` so that every resident
    /// image counts against the budget.
    #[must_use]
    pub fn cost(&self) -> usize {
        self.bytes_per_row
            .map_or(1, |row| row.saturating_mul(self.height as usize))
            .max(1)
    }
}
