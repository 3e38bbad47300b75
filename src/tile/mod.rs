//! Seamless tile layer.
//!
//! This module holds the seamless tiling transform and the pipeline that
//! feeds it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             TextureService              │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  seamless    │  │ TextureEncoder  │  │
//! │  │  + blend     │  │ (JPEG → base64  │  │
//! │  │  (mirror +   │  │   data URI)     │  │
//! │  │  seam blur)  │  │                 │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │       Image acquisition (source)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`build_seamless_tile`]: Resize, mirror into four quadrants, blur the mid-line seams
//! - [`TileSize`]: Validated even tile edge length
//! - [`TextureEncoder`]: Encodes a tile as a JPEG data URI
//! - [`TextureService`]: Main entry point for upload and prompt requests
//!
//! # Example
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use texture_tiler::tile::{build_seamless_tile, TileSize};
//!
//! let photo = RgbImage::from_pixel(640, 480, Rgb([120, 80, 40]));
//! let tile = build_seamless_tile(&photo, TileSize::default()).unwrap();
//! assert_eq!(tile.dimensions(), (256, 256));
//! ```

mod blend;
mod encoder;
mod seamless;
mod service;

pub use blend::{
    blur_horizontal_seam, blur_vertical_seam, fixed_point_kernel, gaussian_blur, gaussian_kernel,
    gaussian_sigma, BLEND_KERNEL_SIZE,
};
pub use encoder::{
    clamp_quality, is_valid_quality, TextureEncoder, DEFAULT_JPEG_QUALITY, JPEG_DATA_URI_PREFIX,
    MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use seamless::{
    build_seamless_tile, compose_quadrants, mirror_quadrants, TileSize, DEFAULT_TILE_SIZE,
};
pub use service::{EncodedTexture, TextureService};
