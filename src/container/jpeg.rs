//! Lossy JPEG codec for the image half of a record.
//!
//! Raw images are `image::RgbImage` buffers: height × width × 3 unsigned
//! 8-bit samples in RGB order, the layout the `image` crate's JPEG codec
//! expects. Encoding is lossy; decoded pixels are close to, but not equal
//! to, the originals. Dimensions are always preserved exactly.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use crate::error::KittirecError;

/// Default JPEG quality used by the writer and the CLI.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encodes a raw RGB image as JPEG bytes at the given quality (1-100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, KittirecError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder
        .encode_image(image)
        .map_err(|source| KittirecError::ImageEncode { source })?;
    Ok(bytes)
}

/// Decodes JPEG bytes back to a raw RGB image.
///
/// Fails with [`KittirecError::ImageDecode`] if the bytes are not a valid
/// JPEG stream.
pub fn decode_jpeg(bytes: &[u8]) -> Result<RgbImage, KittirecError> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .map_err(|source| KittirecError::ImageDecode { source })?;
    Ok(decoded.into_rgb8())
}
