//! HTTP request handlers for the texture API.
//!
//! # Endpoints
//!
//! - `GET /` and `GET /health` - Health check
//! - `POST /upload-texture` - Multipart upload, returns a seamless texture
//! - `POST /generate-tile` - Text prompt, returns a seamless texture

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{AcquireError, TextureError, TileError};
use crate::source::{GenerationRequest, ImageGenerator, MAX_SEED};
use crate::tile::{EncodedTexture, TextureService};

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD_NAME: &str = "file";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the texture service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<G: ImageGenerator> {
    /// The texture service for processing requests
    pub texture_service: Arc<TextureService<G>>,
}

impl<G: ImageGenerator> AppState<G> {
    /// Create a new application state with the given texture service.
    pub fn new(texture_service: TextureService<G>) -> Self {
        Self {
            texture_service: Arc::new(texture_service),
        }
    }
}

impl<G: ImageGenerator> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            texture_service: Arc::clone(&self.texture_service),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// JSON body for tile generation requests.
#[derive(Debug, Deserialize)]
pub struct GenerateTileRequest {
    /// Text prompt (required, must not be blank)
    #[serde(default)]
    pub prompt: String,

    /// Things the provider should avoid (defaults to a fixed quality filter)
    #[serde(default)]
    pub negative_prompt: Option<String>,

    /// Optional deterministic seed
    #[serde(default)]
    pub seed: Option<i64>,
}

impl GenerateTileRequest {
    /// Validate the request and build the provider request from it.
    pub fn to_generation_request(&self) -> Result<GenerationRequest, TextureError> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(TextureError::MissingPrompt);
        }

        let seed = match self.seed {
            None => None,
            Some(seed) if (0..=MAX_SEED as i64).contains(&seed) => Some(seed as u32),
            Some(seed) => {
                return Err(TextureError::InvalidSeed {
                    seed,
                    max: MAX_SEED as i64,
                })
            }
        };

        Ok(GenerationRequest::new(
            prompt,
            self.negative_prompt.clone(),
            seed,
        ))
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,

    /// Error type identifier (e.g., "invalid_image", "provider_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Fixed status message
    pub message: String,

    /// Service version
    pub version: String,
}

/// Successful texture response.
#[derive(Debug, Serialize)]
pub struct TextureResponse {
    /// Always true
    pub success: bool,

    /// JPEG data URI of the seamless tile
    pub texture_url: String,

    /// Tile edge length in pixels
    pub size: u32,

    /// The caller's original prompt (generation requests only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl TextureResponse {
    fn from_texture(texture: EncodedTexture, prompt: Option<String>) -> Self {
        Self {
            success: true,
            texture_url: texture.data_uri,
            size: texture.size,
            prompt,
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert TextureError to HTTP response.
///
/// Client errors are logged at WARN level. Server errors are logged at ERROR
/// level with full detail; transform, encode and internal failures return a
/// short message only.
impl IntoResponse for TextureError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            // 400 Bad Request
            TextureError::InvalidRequest { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }
            TextureError::MissingPrompt => {
                (StatusCode::BAD_REQUEST, "missing_prompt", self.to_string())
            }
            TextureError::InvalidSeed { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_seed", self.to_string())
            }
            TextureError::MissingFile => (
                StatusCode::BAD_REQUEST,
                "missing_file",
                format!("{} (expected field '{}')", self, UPLOAD_FIELD_NAME),
            ),
            TextureError::Acquire(AcquireError::InvalidImage { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_image", self.to_string())
            }
            TextureError::Tile(TileError::EmptyImage { .. }) => (
                StatusCode::BAD_REQUEST,
                "invalid_image",
                format!("Invalid image file: {}", self),
            ),

            // 413 Payload Too Large
            TextureError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                self.to_string(),
            ),

            // 500 Internal Server Error - provider failures carry provider text
            TextureError::Acquire(AcquireError::Provider { message, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "provider_error",
                format!("Image provider error: {}", message),
            ),
            TextureError::Acquire(AcquireError::NoImageGenerated) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "no_image_generated",
                self.to_string(),
            ),
            TextureError::Acquire(AcquireError::InvalidGeneratedImage { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_generated_image",
                "Failed to decode generated image".to_string(),
            ),

            // 500 Internal Server Error - generic message, detail only in logs
            TextureError::Tile(TileError::InvalidTileSize { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "transform_error",
                "Error processing image".to_string(),
            ),
            TextureError::Encode(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encode_error",
                "Error encoding texture".to_string(),
            ),
            TextureError::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        // Log errors based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                detail = %self,
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

fn multipart_error(err: MultipartError) -> TextureError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TextureError::PayloadTooLarge {
            message: err.body_text(),
        }
    } else {
        TextureError::InvalidRequest {
            message: err.body_text(),
        }
    }
}

fn json_error(rejection: JsonRejection) -> TextureError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TextureError::PayloadTooLarge {
            message: rejection.body_text(),
        }
    } else {
        TextureError::InvalidRequest {
            message: rejection.body_text(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /` (also `GET /health`)
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Texture tiler API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle texture uploads.
///
/// # Endpoint
///
/// `POST /upload-texture` with a `multipart/form-data` body containing a
/// `file` field. If no part is named `file`, the first part carrying a file
/// name is used.
///
/// # Response
///
/// - `200 OK`: `{success, texture_url, size}`
/// - `400 Bad Request`: Missing file, malformed body, or undecodable image
/// - `413 Payload Too Large`: Upload exceeds the configured limit
/// - `500 Internal Server Error`: Processing error
pub async fn upload_texture_handler<G: ImageGenerator + 'static>(
    State(state): State<AppState<G>>,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> Result<Json<TextureResponse>, TextureError> {
    let mut multipart = multipart.map_err(|rejection| TextureError::InvalidRequest {
        message: rejection.body_text(),
    })?;

    // The `file` part wins wherever it appears; otherwise the first part
    // carrying a file name is used.
    let mut upload = None;
    let mut fallback = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let is_named_file = field.name() == Some(UPLOAD_FIELD_NAME);
        if !is_named_file && (fallback.is_some() || field.file_name().is_none()) {
            continue;
        }

        debug!(
            field = field.name().unwrap_or(""),
            file_name = field.file_name().unwrap_or(""),
            content_type = field.content_type().unwrap_or(""),
            "Received upload part"
        );
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if is_named_file {
            upload = Some(bytes);
            break;
        }
        fallback = Some(bytes);
    }

    let data = upload.or(fallback).ok_or(TextureError::MissingFile)?;
    debug!(bytes = data.len(), "Upload read");

    let texture = state.texture_service.texture_from_upload(data).await?;
    debug!(size = texture.size, "Sending texture response");

    Ok(Json(TextureResponse::from_texture(texture, None)))
}

/// Handle tile generation from a text prompt.
///
/// # Endpoint
///
/// `POST /generate-tile` with JSON body
/// `{"prompt": "...", "negative_prompt": "...", "seed": 42}`.
///
/// # Response
///
/// - `200 OK`: `{success, texture_url, size, prompt}`
/// - `400 Bad Request`: Malformed JSON, missing prompt, or invalid seed
/// - `500 Internal Server Error`: Provider failure, empty or undecodable image
pub async fn generate_tile_handler<G: ImageGenerator + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<GenerateTileRequest>, JsonRejection>,
) -> Result<Json<TextureResponse>, TextureError> {
    let Json(payload) = payload.map_err(json_error)?;
    let request = payload.to_generation_request()?;

    debug!(prompt = %payload.prompt, seed = ?request.seed, "Generating tile");

    let texture = state.texture_service.texture_from_prompt(&request).await?;
    debug!(size = texture.size, "Sending generated texture response");

    Ok(Json(TextureResponse::from_texture(
        texture,
        Some(payload.prompt),
    )))
}

// =============================================================================
// Tests
// =============================================================================
