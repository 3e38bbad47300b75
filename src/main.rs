//! Texture Tiler - seamless texture tile server.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use texture_tiler::{
    config::Config,
    server::{create_router, RouterConfig},
    source::{create_bedrock_client, BedrockImageGenerator},
    tile::{TextureEncoder, TextureService, TileSize},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let tile_size = match TileSize::new(config.tile_size) {
        Ok(size) => size,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Texture Tiler v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Tile size: {}px", tile_size.get());
    info!("  JPEG quality: {}", config.jpeg_quality);
    info!("  Max upload: {} bytes", config.max_upload_bytes);
    info!("  Bedrock region: {}", config.bedrock_region);
    if let Some(ref endpoint) = config.bedrock_endpoint {
        info!("  Bedrock endpoint: {}", endpoint);
    }
    info!("  Bedrock model: {}", config.bedrock_model_id);
    info!("  CORS origins: {}", config.cors_origins.join(", "));

    // Create the provider client once and inject it into the service
    let client =
        create_bedrock_client(config.bedrock_endpoint.as_deref(), &config.bedrock_region).await;
    let generator = BedrockImageGenerator::new(client, config.bedrock_model_id.clone());

    let texture_service = TextureService::with_settings(
        generator,
        tile_size,
        TextureEncoder::with_quality(config.jpeg_quality),
    );

    let router = create_router(texture_service, build_router_config(&config));

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/", addr);
    info!("  curl -F file=@photo.jpg http://{}/upload-texture", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "texture_tiler=debug,tower_http=debug"
    } else {
        "texture_tiler=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    RouterConfig::new()
        .with_cors_origins(config.cors_origins.clone())
        .with_max_upload_bytes(config.max_upload_bytes)
        .with_tracing(!config.no_tracing)
}
