//! AWS Bedrock image generator.
//!
//! Calls the Amazon Titan Image Generator through the Bedrock runtime
//! `InvokeModel` API. The JSON body is built from [`TitanRequest`] and the
//! response is parsed by [`parse_titan_response`], which is kept free of any
//! SDK types so it can be tested without network access.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::ProvideErrorMetadata;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AcquireError;

use super::{GenerationRequest, ImageGenerator};

/// Default Bedrock model identifier.
pub const DEFAULT_MODEL_ID: &str = "amazon.titan-image-generator-v2:0";

/// Edge length requested from the provider.
pub const GENERATED_IMAGE_SIZE: u32 = 512;

const TASK_TYPE: &str = "TEXT_IMAGE";
const QUALITY_TIER: &str = "premium";
const CFG_SCALE: f32 = 10.0;

// =============================================================================
// Wire Types
// =============================================================================

/// Request body for Titan text-to-image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToImageParams {
    pub text: String,
    pub negative_text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub number_of_images: u32,
    pub quality: String,
    pub height: u32,
    pub width: u32,
    pub cfg_scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl From<&GenerationRequest> for TitanRequest {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            task_type: TASK_TYPE.to_string(),
            text_to_image_params: TextToImageParams {
                text: request.prompt.clone(),
                negative_text: request.negative_prompt.clone(),
            },
            image_generation_config: ImageGenerationConfig {
                number_of_images: 1,
                quality: QUALITY_TIER.to_string(),
                height: GENERATED_IMAGE_SIZE,
                width: GENERATED_IMAGE_SIZE,
                cfg_scale: CFG_SCALE,
                seed: request.seed,
            },
        }
    }
}

/// Response body from Titan text-to-image.
#[derive(Debug, Clone, Deserialize)]
pub struct TitanResponse {
    /// Base64-encoded images
    #[serde(default)]
    pub images: Vec<String>,

    /// Error reported by the model, if any
    #[serde(default)]
    pub error: Option<String>,
}

/// Extract the first image from a raw Titan response body.
///
/// # Errors
///
/// - [`AcquireError::Provider`] if the body is not valid JSON or carries an
///   `error` message
/// - [`AcquireError::NoImageGenerated`] if the image list is empty
/// - [`AcquireError::InvalidGeneratedImage`] if the first image is not valid base64
pub fn parse_titan_response(body: &[u8]) -> Result<Bytes, AcquireError> {
    let response: TitanResponse =
        serde_json::from_slice(body).map_err(|e| AcquireError::Provider {
            code: None,
            message: format!("malformed response body: {}", e),
        })?;

    if let Some(message) = response.error.filter(|m| !m.is_empty()) {
        return Err(AcquireError::Provider {
            code: None,
            message,
        });
    }

    let encoded = response
        .images
        .into_iter()
        .next()
        .ok_or(AcquireError::NoImageGenerated)?;

    let decoded = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| AcquireError::InvalidGeneratedImage {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(decoded))
}

// =============================================================================
// Generator
// =============================================================================

/// Bedrock-backed implementation of [`ImageGenerator`].
///
/// # Example
///
/// ```ignore
/// use texture_tiler::source::{create_bedrock_client, BedrockImageGenerator, DEFAULT_MODEL_ID};
///
/// let client = create_bedrock_client(None, "us-east-1").await;
/// let generator = BedrockImageGenerator::new(client, DEFAULT_MODEL_ID);
/// ```
#[derive(Clone)]
pub struct BedrockImageGenerator {
    client: Client,
    model_id: String,
}

impl BedrockImageGenerator {
    /// Create a generator for the given model.
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// Get the model identifier.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl ImageGenerator for BedrockImageGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Bytes, AcquireError> {
        let body = serde_json::to_vec(&TitanRequest::from(request)).map_err(|e| {
            AcquireError::Provider {
                code: None,
                message: e.to_string(),
            }
        })?;

        debug!(model_id = %self.model_id, "Invoking Bedrock model");

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(service_err) => AcquireError::Provider {
                    code: service_err.code().map(str::to_string),
                    message: service_err
                        .message()
                        .map(str::to_string)
                        .unwrap_or_else(|| service_err.to_string()),
                },
                None => AcquireError::Provider {
                    code: None,
                    message: e.to_string(),
                },
            })?;

        debug!("Bedrock response received");

        parse_titan_response(output.body().as_ref())
    }
}

/// Create a Bedrock runtime client with optional custom endpoint and region.
///
/// Credentials come from the default AWS provider chain.
pub async fn create_bedrock_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;
    Client::new(&sdk_config)
}
