//! Image acquisition.
//!
//! Source images reach the tile pipeline in one of two ways:
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────┐
//! │   multipart upload   │        │  prompt + negative + seed    │
//! └──────────┬───────────┘        └──────────────┬───────────────┘
//!            │                                   │
//!            │                                   ▼
//!            │                    ┌──────────────────────────────┐
//!            │                    │   ImageGenerator (trait)     │
//!            │                    │   BedrockImageGenerator      │
//!            │                    └──────────────┬───────────────┘
//!            ▼                                   ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │               decode_upload / decode_generated                  │
//! │                      (bytes → RgbImage)                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The generator is injected into the service at construction, so tests can
//! substitute a deterministic stub for the remote provider.

mod bedrock;
mod decode;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::AcquireError;

pub use bedrock::{
    create_bedrock_client, parse_titan_response, BedrockImageGenerator, ImageGenerationConfig,
    TextToImageParams, TitanRequest, TitanResponse, DEFAULT_MODEL_ID, GENERATED_IMAGE_SIZE,
};
pub use decode::{decode_generated, decode_upload};

/// Negative prompt used when the caller does not supply one.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, low quality, distorted, watermark, text";

/// Qualifiers appended to every prompt to bias the provider toward tileable output.
pub const TILEABLE_QUALIFIERS: &str = "seamless texture, tileable pattern, high quality, detailed";

/// Largest seed accepted by the provider.
pub const MAX_SEED: u32 = 2_147_483_646;

/// Append the tileable qualifiers to a user prompt.
pub fn enhance_prompt(prompt: &str) -> String {
    format!("{}, {}", prompt, TILEABLE_QUALIFIERS)
}

/// A text-to-image request as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Prompt with tileable qualifiers already appended
    pub prompt: String,

    /// Things the provider should avoid
    pub negative_prompt: String,

    /// Optional deterministic seed
    pub seed: Option<u32>,
}

impl GenerationRequest {
    /// Build a request from a user prompt, enhancing it and filling in the
    /// default negative prompt when none is given.
    pub fn new(prompt: &str, negative_prompt: Option<String>, seed: Option<u32>) -> Self {
        Self {
            prompt: enhance_prompt(prompt),
            negative_prompt: negative_prompt
                .unwrap_or_else(|| DEFAULT_NEGATIVE_PROMPT.to_string()),
            seed,
        }
    }
}

/// A text-to-image provider.
///
/// Implementations make a single attempt and return the encoded image bytes
/// (PNG, JPEG, ...) of the first generated image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<Bytes, AcquireError>;
}
