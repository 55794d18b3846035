mod image_cache_port;
mod reviews_port;

pub use image_cache_port::{ImageDecoderPort, ImageLoaderPort, ImageTransferPort};
pub use reviews_port::ReviewsPort;

#[cfg(test)]
pub mod mocks {
    pub use super::image_cache_port::mock::{StubDecoder, StubTransfer};
    pub use super::reviews_port::MockReviewsPort;
}
