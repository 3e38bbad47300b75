use std::io::Cursor;

use image::{ImageReader, RgbImage};

use crate::error::AcquireError;

/// Decode raw bytes of any supported format into RGB8.
///
/// Alpha is dropped and grayscale is expanded.
fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, String> {
    if bytes.is_empty() {
        return Err("empty input".to_string());
    }

    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())?;

    if image.width() == 0 || image.height() == 0 {
        return Err(format!("image has no pixels ({}x{})", image.width(), image.height()));
    }

    Ok(image.to_rgb8())
}

/// Decode an uploaded file.
///
/// Failures are the caller's fault and map to [`AcquireError::InvalidImage`].
pub fn decode_upload(bytes: &[u8]) -> Result<RgbImage, AcquireError> {
    decode_rgb(bytes).map_err(|message| AcquireError::InvalidImage { message })
}

/// Decode an image returned by the generation provider.
///
/// Failures are server-side and map to [`AcquireError::InvalidGeneratedImage`].
pub fn decode_generated(bytes: &[u8]) -> Result<RgbImage, AcquireError> {
    decode_rgb(bytes).map_err(|message| AcquireError::InvalidGeneratedImage { message })
}
