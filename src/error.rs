use thiserror::Error;

/// Errors raised by the seamless tile transform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Tile edge length cannot be split into two equal quadrants with room
    /// for both seam bands
    #[error("Invalid tile size: {size} (must be an even number of at least {min})")]
    InvalidTileSize { size: u32, min: u32 },

    /// Source image has no pixels
    #[error("Empty image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

/// Errors that can occur while obtaining a source image
#[derive(Debug, Clone, Error)]
pub enum AcquireError {
    /// Uploaded bytes are corrupt or in an unsupported format (should map to HTTP 400)
    #[error("Invalid image file: {message}")]
    InvalidImage { message: String },

    /// The generation provider reported an error
    #[error("Provider error{}: {message}", code.as_ref().map(|c| format!(" ({})", c)).unwrap_or_default())]
    Provider {
        code: Option<String>,
        message: String,
    },

    /// The generation provider returned an empty image list
    #[error("No image generated by provider")]
    NoImageGenerated,

    /// The generation provider returned bytes that are not a decodable image
    #[error("Failed to decode generated image: {message}")]
    InvalidGeneratedImage { message: String },
}

/// Errors that can occur when encoding a finished tile
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// JPEG encoder failure
    #[error("JPEG encoding failed: {0}")]
    Jpeg(String),
}

/// Request-level error covering every way a texture request can fail.
///
/// Converted to an HTTP response at the handler boundary.
#[derive(Debug, Clone, Error)]
pub enum TextureError {
    /// Request body could not be parsed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Generation request without a usable prompt
    #[error("Prompt is required")]
    MissingPrompt,

    /// Seed outside the range accepted by the provider
    #[error("Invalid seed: {seed} (must be between 0 and {max})")]
    InvalidSeed { seed: i64, max: i64 },

    /// Multipart upload without a file part
    #[error("No file field in upload")]
    MissingFile,

    /// Upload body exceeded the configured limit
    #[error("Upload too large: {message}")]
    PayloadTooLarge { message: String },

    #[error(transparent)]
    Acquire(#[from] AcquireError),

    #[error(transparent)]
    Tile(#[from] TileError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Worker task failure
    #[error("Internal error: {message}")]
    Internal { message: String },
}
