//! Router configuration for the texture API.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! upload size limits and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /                  - Health check
//! /health            - Health check
//! /upload-texture    - POST multipart upload
//! /generate-tile     - POST JSON prompt
//! ```
//!
//! # Example
//!
//! ```ignore
//! use texture_tiler::server::routes::{create_router, RouterConfig};
//! use texture_tiler::tile::TextureService;
//!
//! let service = TextureService::new(generator);
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(service, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{generate_tile_handler, health_handler, upload_texture_handler, AppState};
use crate::source::ImageGenerator;
use crate::tile::TextureService;

/// Origins allowed by default (local frontend dev servers).
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:3000",
];

/// Default maximum request body size (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<String>,

    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows the local development origins
    /// - Uploads up to 20 MiB are accepted
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_tracing: true,
        }
    }

    /// Set the allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `texture_service` - The texture service for handling requests
/// * `config` - Router configuration
pub fn create_router<G>(texture_service: TextureService<G>, config: RouterConfig) -> Router
where
    G: ImageGenerator + 'static,
{
    let app_state = AppState::new(texture_service);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/upload-texture", post(upload_texture_handler::<G>))
        .route("/generate-tile", post(generate_tile_handler::<G>))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
///
/// Credentialed requests cannot use wildcards, so methods and headers are
/// mirrored from the preflight request instead.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400)) // 24 hours
}

// =============================================================================
// Tests
// =============================================================================
