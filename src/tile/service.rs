//! Texture Service for orchestrating tile generation.
//!
//! The TextureService is the main entry point for texture requests. It
//! orchestrates:
//! - Source acquisition (upload decode or provider call)
//! - The seamless tile transform
//! - JPEG / data URI encoding
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        TextureService                           │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │      texture_from_upload()      texture_from_prompt()     │  │
//! │  │  1. Decode bytes             1. Call generator            │  │
//! │  │                              2. Decode bytes              │  │
//! │  │            ──────────── render() ────────────             │  │
//! │  │  3. Build seamless tile     4. Encode as data URI         │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │          │                        │                    │        │
//! │          ▼                        ▼                    ▼        │
//! │  ┌────────────────┐   ┌──────────────────────┐  ┌────────────┐  │
//! │  │ ImageGenerator │   │ build_seamless_tile  │  │  Encoder   │  │
//! │  └────────────────┘   └──────────────────────┘  └────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding, tiling and encoding are CPU-bound and run on the blocking pool.

use std::sync::Arc;

use bytes::Bytes;
use image::RgbImage;
use tracing::debug;

use crate::error::TextureError;
use crate::source::{decode_generated, decode_upload, GenerationRequest, ImageGenerator};

use super::encoder::TextureEncoder;
use super::seamless::{build_seamless_tile, TileSize};

// =============================================================================
// Encoded Texture
// =============================================================================

/// A finished texture ready for the JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTexture {
    /// `data:image/jpeg;base64,...` string
    pub data_uri: String,

    /// Tile edge length in pixels
    pub size: u32,
}

// =============================================================================
// Texture Service
// =============================================================================

/// Service turning uploads and prompts into seamless textures.
///
/// The service holds no per-request state; one instance is shared by all
/// handlers.
///
/// # Type Parameters
///
/// * `G` - The image generator used for prompt requests
///
/// # Example
///
/// ```ignore
/// use texture_tiler::tile::TextureService;
///
/// let service = TextureService::new(generator);
/// let texture = service.texture_from_upload(bytes).await?;
/// println!("{} chars, {}px", texture.data_uri.len(), texture.size);
/// ```
pub struct TextureService<G: ImageGenerator> {
    /// Provider for prompt-based requests
    generator: Arc<G>,

    /// Output tile edge length
    tile_size: TileSize,

    /// Output encoder
    encoder: TextureEncoder,
}

impl<G: ImageGenerator> TextureService<G> {
    /// Create a new service with the default tile size and encoder.
    pub fn new(generator: G) -> Self {
        Self::with_settings(generator, TileSize::default(), TextureEncoder::new())
    }

    /// Create a new service with explicit tile size and encoder.
    pub fn with_settings(generator: G, tile_size: TileSize, encoder: TextureEncoder) -> Self {
        Self {
            generator: Arc::new(generator),
            tile_size,
            encoder,
        }
    }

    /// Build a texture from uploaded file bytes.
    ///
    /// # Errors
    ///
    /// - [`AcquireError::InvalidImage`](crate::AcquireError::InvalidImage) if
    ///   the bytes do not decode
    /// - [`TextureError::Encode`] if JPEG encoding fails
    pub async fn texture_from_upload(&self, data: Bytes) -> Result<EncodedTexture, TextureError> {
        let tile_size = self.tile_size;
        let encoder = self.encoder;

        run_blocking(move || {
            let image = decode_upload(&data)?;
            render(&image, tile_size, &encoder)
        })
        .await
    }

    /// Build a texture from a generation request.
    ///
    /// The provider is called exactly once; any provider failure is returned
    /// without attempting the transform.
    pub async fn texture_from_prompt(
        &self,
        request: &GenerationRequest,
    ) -> Result<EncodedTexture, TextureError> {
        let data = self.generator.generate(request).await?;
        debug!(bytes = data.len(), "Generated image received");

        let tile_size = self.tile_size;
        let encoder = self.encoder;

        run_blocking(move || {
            let image = decode_generated(&data)?;
            render(&image, tile_size, &encoder)
        })
        .await
    }
}

/// Decode-independent tail of the pipeline: tile, then encode.
fn render(
    image: &RgbImage,
    tile_size: TileSize,
    encoder: &TextureEncoder,
) -> Result<EncodedTexture, TextureError> {
    debug!(
        width = image.width(),
        height = image.height(),
        "Image decoded"
    );

    let tile = build_seamless_tile(image, tile_size)?;
    debug!(size = tile.width(), "Seamless tile created");

    let data_uri = encoder.encode_data_uri(&tile)?;
    debug!(length = data_uri.len(), "Texture encoded");

    Ok(EncodedTexture {
        data_uri,
        size: tile_size.get(),
    })
}

async fn run_blocking<F>(f: F) -> Result<EncodedTexture, TextureError>
where
    F: FnOnce() -> Result<EncodedTexture, TextureError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TextureError::Internal {
            message: e.to_string(),
        })?
}
