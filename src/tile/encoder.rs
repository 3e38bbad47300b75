//! Texture encoder.
//!
//! Turns a finished tile into the string carried in the JSON response: the
//! tile is JPEG-compressed, base64-encoded, and prefixed so browsers can use
//! it directly as an image source.
//!
//! Tiles are already RGB, so no channel reordering happens before
//! compression.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::EncodeError;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Prefix marking a base64 JPEG data URI.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

// =============================================================================
// Texture Encoder
// =============================================================================

/// Encodes tiles as JPEG data URIs.
///
/// # Example
///
/// ```
/// use image::{Rgb, RgbImage};
/// use texture_tiler::tile::TextureEncoder;
///
/// let tile = RgbImage::from_pixel(16, 16, Rgb([90, 120, 200]));
/// let uri = TextureEncoder::new().encode_data_uri(&tile).unwrap();
/// assert!(uri.starts_with("data:image/jpeg;base64,"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureEncoder {
    quality: u8,
}

impl Default for TextureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureEncoder {
    /// Create an encoder at the default quality.
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Create an encoder at the given quality, clamped to 1-100.
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: clamp_quality(quality),
        }
    }

    /// JPEG quality used by this encoder.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Compress a tile to JPEG.
    pub fn encode_jpeg(&self, tile: &RgbImage) -> Result<Bytes, EncodeError> {
        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, self.quality);

        encoder
            .encode_image(tile)
            .map_err(|e| EncodeError::Jpeg(e.to_string()))?;

        Ok(Bytes::from(output))
    }

    /// Compress a tile to JPEG and wrap it as a base64 data URI.
    pub fn encode_data_uri(&self, tile: &RgbImage) -> Result<String, EncodeError> {
        let jpeg = self.encode_jpeg(tile)?;
        Ok(format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(&jpeg)))
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to the valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
