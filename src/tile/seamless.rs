//! Mirror tiling.
//!
//! A seamless tile is built from a single quadrant and its three reflections:
//!
//! ```text
//! ┌─────────┬─────────┐
//! │    Q    │ flip_h  │
//! │         │   (Q)   │
//! ├─────────┼─────────┤
//! │ flip_v  │ rot180  │
//! │   (Q)   │   (Q)   │
//! └─────────┴─────────┘
//! ```
//!
//! Opposite outer edges are reflections of the same quadrant edge, so copies
//! of the tile meet without a seam. The two interior mid-lines are the only
//! discontinuities left, and [`build_seamless_tile`] smooths them with
//! [`blend`](super::blend).

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::error::TileError;

use super::blend::{blur_horizontal_seam, blur_vertical_seam, BLEND_KERNEL_SIZE};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Edge length of a square seamless tile.
///
/// Always even, and large enough for both seam bands to fit inside the tile.
/// Odd sizes are rejected rather than truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSize(u32);

impl TileSize {
    /// Smallest accepted edge length.
    pub const MIN: u32 = 2 * BLEND_KERNEL_SIZE;

    /// Validate and wrap a tile edge length.
    pub fn new(size: u32) -> Result<Self, TileError> {
        if size < Self::MIN || size % 2 != 0 {
            return Err(TileError::InvalidTileSize {
                size,
                min: Self::MIN,
            });
        }
        Ok(Self(size))
    }

    /// Edge length in pixels.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Edge length of one quadrant.
    pub fn half(self) -> u32 {
        self.0 / 2
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self(DEFAULT_TILE_SIZE)
    }
}

impl TryFrom<u32> for TileSize {
    type Error = TileError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

/// Produce the four quadrants in reading order: top-left, top-right,
/// bottom-left, bottom-right.
pub fn mirror_quadrants(quadrant: &RgbImage) -> [RgbImage; 4] {
    [
        quadrant.clone(),
        imageops::flip_horizontal(quadrant),
        imageops::flip_vertical(quadrant),
        imageops::rotate180(quadrant),
    ]
}

/// Stitch four equally sized quadrants into one image twice their size.
pub fn compose_quadrants(quadrants: &[RgbImage; 4]) -> RgbImage {
    let (w, h) = quadrants[0].dimensions();
    let mut tile = RgbImage::new(w * 2, h * 2);

    let offsets = [(0, 0), (w, 0), (0, h), (w, h)];
    for (quadrant, (x, y)) in quadrants.iter().zip(offsets) {
        imageops::replace(&mut tile, quadrant, x as i64, y as i64);
    }

    tile
}

/// Build a square tile of `size` that repeats without seams at its borders.
///
/// The input is downscaled to one quadrant with a Lanczos filter, mirrored
/// into four quadrants, and the interior mid-lines are blurred: first the
/// horizontal band, then the vertical band over the already blurred buffer,
/// so the centre crossing is smoothed twice.
///
/// # Errors
///
/// Returns [`TileError::EmptyImage`] if the input has no pixels.
pub fn build_seamless_tile(image: &RgbImage, size: TileSize) -> Result<RgbImage, TileError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TileError::EmptyImage { width, height });
    }

    let half = size.half();
    let quadrant = imageops::resize(image, half, half, FilterType::Lanczos3);

    let mut tile = compose_quadrants(&mirror_quadrants(&quadrant));

    let center = size.get() / 2;
    blur_horizontal_seam(&mut tile, center, BLEND_KERNEL_SIZE, BLEND_KERNEL_SIZE);
    blur_vertical_seam(&mut tile, center, BLEND_KERNEL_SIZE, BLEND_KERNEL_SIZE);

    Ok(tile)
}
