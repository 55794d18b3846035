//! Raster decoder backed by the `image` crate.

use crate::domain::entities::DecodedImage;
use crate::domain::errors::DecodeError;
use crate::domain::ports::ImageDecoderPort;

/// Decodes PNG, JPEG and WebP into in-memory pixel buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelDecoder;

impl ImageDecoderPort for PixelDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        image::load_from_memory(bytes)
            .map(DecodedImage::from_pixels)
            .map_err(|e| DecodeError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let mut png = Vec::new();
        image::DynamicImage::new_rgba8(8, 2)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = PixelDecoder.decode(&png).unwrap();

        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.cost(), 64);
        assert!(decoded.pixels().is_some());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(PixelDecoder.decode(b"definitely not an image").is_err());
    }
}
