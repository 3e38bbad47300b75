//! HTTP server layer for the texture API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /upload-texture         POST /generate-tile         │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (requests, error mapping)│  │ (CORS, limits, tracing)     │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    generate_tile_handler, health_handler, upload_texture_handler, AppState, ErrorResponse,
    GenerateTileRequest, HealthResponse, TextureResponse, UPLOAD_FIELD_NAME,
};
pub use routes::{create_router, RouterConfig, DEFAULT_CORS_ORIGINS, DEFAULT_MAX_UPLOAD_BYTES};
