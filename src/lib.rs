//! # Texture Tiler
//!
//! An HTTP service that turns an arbitrary photograph into a small repeating
//! texture tile.
//!
//! Source images come either from a multipart upload or from a text-to-image
//! provider (Amazon Titan on AWS Bedrock). Each image is downscaled, mirrored
//! into four quadrants so opposite edges match exactly, and blurred along the
//! interior mid-lines. The result is returned as a JPEG data URI inside a JSON
//! envelope.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`tile`] - Seamless tile transform, encoder and pipeline service
//! - [`source`] - Upload decoding and the image generator abstraction
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types for every stage
//!
//! ## Example
//!
//! ```rust
//! use image::{Rgb, RgbImage};
//! use texture_tiler::{build_seamless_tile, TextureEncoder, TileSize};
//!
//! let photo = RgbImage::from_fn(300, 200, |x, y| Rgb([x as u8, y as u8, 128]));
//! let tile = build_seamless_tile(&photo, TileSize::default()).unwrap();
//!
//! // Opposite edges match, so the tile repeats without seams
//! assert_eq!(tile.get_pixel(0, 17), tile.get_pixel(255, 17));
//!
//! let uri = TextureEncoder::new().encode_data_uri(&tile).unwrap();
//! assert!(uri.starts_with("data:image/jpeg;base64,"));
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod source;
pub mod tile;

// Re-export commonly used types
pub use config::Config;
pub use error::{AcquireError, EncodeError, TextureError, TileError};
pub use server::{
    create_router, generate_tile_handler, health_handler, upload_texture_handler, AppState,
    ErrorResponse, GenerateTileRequest, HealthResponse, RouterConfig, TextureResponse,
};
pub use source::{
    create_bedrock_client, decode_generated, decode_upload, enhance_prompt,
    BedrockImageGenerator, GenerationRequest, ImageGenerator, DEFAULT_NEGATIVE_PROMPT,
};
pub use tile::{
    build_seamless_tile, compose_quadrants, mirror_quadrants, EncodedTexture, TextureEncoder,
    TextureService, TileSize, BLEND_KERNEL_SIZE, DEFAULT_JPEG_QUALITY, DEFAULT_TILE_SIZE,
};
