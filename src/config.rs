//! Configuration management for the texture tiler.
//!
//! Settings come from command-line arguments (clap) with `TILER_`-prefixed
//! environment variable fallbacks and sensible defaults for everything.
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use texture_tiler::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `TILER_HOST` - Server bind address (default: 0.0.0.0)
//! - `TILER_PORT` - Server port (default: 8000)
//! - `TILER_TILE_SIZE` - Output tile edge length, even (default: 256)
//! - `TILER_JPEG_QUALITY` - Output JPEG quality (default: 90)
//! - `TILER_MAX_UPLOAD_BYTES` - Request body limit (default: 20 MiB)
//! - `TILER_CORS_ORIGINS` - Comma-separated allowed origins
//! - `TILER_BEDROCK_REGION` - AWS region for Bedrock (default: us-east-1)
//! - `TILER_BEDROCK_ENDPOINT` - Custom Bedrock runtime endpoint
//! - `TILER_BEDROCK_MODEL_ID` - Image model (default: amazon.titan-image-generator-v2:0)

use clap::Parser;

use crate::server::{DEFAULT_CORS_ORIGINS, DEFAULT_MAX_UPLOAD_BYTES};
use crate::source::DEFAULT_MODEL_ID;
use crate::tile::{is_valid_quality, TileSize, DEFAULT_JPEG_QUALITY, DEFAULT_TILE_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default AWS region for Bedrock.
pub const DEFAULT_REGION: &str = "us-east-1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Texture Tiler - turns photos and generated images into seamless tiles.
#[derive(Parser, Debug, Clone)]
#[command(name = "texture-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TILER_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TILER_PORT")]
    pub port: u16,

    /// Maximum request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "TILER_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    // =========================================================================
    // Tile Configuration
    // =========================================================================
    /// Edge length of the output tile in pixels (even, at least 10).
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "TILER_TILE_SIZE")]
    pub tile_size: u32,

    /// JPEG quality for the encoded tile (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "TILER_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    // =========================================================================
    // Bedrock Configuration
    // =========================================================================
    /// AWS region for the Bedrock runtime.
    #[arg(long, default_value = DEFAULT_REGION, env = "TILER_BEDROCK_REGION")]
    pub bedrock_region: String,

    /// Custom Bedrock runtime endpoint URL.
    #[arg(long, env = "TILER_BEDROCK_ENDPOINT")]
    pub bedrock_endpoint: Option<String>,

    /// Bedrock model used for text-to-image generation.
    #[arg(long, default_value = DEFAULT_MODEL_ID, env = "TILER_BEDROCK_MODEL_ID")]
    pub bedrock_model_id: String,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    #[arg(
        long,
        env = "TILER_CORS_ORIGINS",
        value_delimiter = ',',
        default_values_t = DEFAULT_CORS_ORIGINS.map(String::from)
    )]
    pub cors_origins: Vec<String>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = TileSize::new(self.tile_size) {
            return Err(format!("tile_size: {}", e));
        }

        if !is_valid_quality(self.jpeg_quality) {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        if self.bedrock_region.trim().is_empty() {
            return Err(
                "Bedrock region is required. Set --bedrock-region or TILER_BEDROCK_REGION"
                    .to_string(),
            );
        }

        if self.bedrock_model_id.trim().is_empty() {
            return Err("bedrock_model_id must not be empty".to_string());
        }

        // Credentialed CORS cannot answer with a wildcard origin
        if self.cors_origins.iter().any(|o| o.trim() == "*") {
            return Err("CORS origins must be listed explicitly, '*' is not allowed".to_string());
        }

        if let Some(origin) = self
            .cors_origins
            .iter()
            .find(|o| o.parse::<http::HeaderValue>().is_err())
        {
            return Err(format!("Invalid CORS origin: {:?}", origin));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
