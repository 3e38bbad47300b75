//! Upload integration tests.
//!
//! Tests verify:
//! - Health check responses
//! - Successful texture creation from uploaded images
//! - Client errors for undecodable, missing and oversized uploads

use axum::body::Body;
use axum::http::{Request, StatusCode};
use image::{ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

use texture_tiler::tile::{TextureEncoder, TextureService, TileSize};
use texture_tiler::{create_router, RouterConfig};

use super::test_utils::{
    body_json, decode_texture_url, encode_image, solid_png, test_router, upload_request,
    upload_request_with_field, upload_request_with_parts, StubBehavior, StubGenerator,
};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check_root() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["message"], "Texture tiler API is running");
}

#[tokio::test]
async fn test_health_check_alias() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Successful Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_solid_color_png() {
    let generator = StubGenerator::new(StubBehavior::NoImage);
    let router = test_router(generator.clone());

    let response = router
        .oneshot(upload_request(&solid_png(100, 100, [40, 160, 220])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["size"], 256);
    assert!(json.get("prompt").is_none());

    let tile = decode_texture_url(json["texture_url"].as_str().unwrap());
    assert_eq!(tile.dimensions(), (256, 256));

    // JPEG is lossy, but a flat field survives within a small tolerance
    for p in tile.pixels() {
        assert!((p[0] as i32 - 40).abs() <= 4, "red was {}", p[0]);
        assert!((p[1] as i32 - 160).abs() <= 4, "green was {}", p[1]);
        assert!((p[2] as i32 - 220).abs() <= 4, "blue was {}", p[2]);
    }

    // Uploads never touch the provider
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_upload_jpeg_with_odd_dimensions() {
    let img = RgbImage::from_fn(333, 97, |x, y| Rgb([x as u8, y as u8, 77]));
    let data = encode_image(&img, ImageFormat::Jpeg);

    let router = test_router(StubGenerator::new(StubBehavior::NoImage));
    let response = router.oneshot(upload_request(&data)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let tile = decode_texture_url(json["texture_url"].as_str().unwrap());
    assert_eq!(tile.dimensions(), (256, 256));
}

#[tokio::test]
async fn test_upload_accepts_any_named_file_part() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let request =
        upload_request_with_field("image", Some("photo.png"), &solid_png(8, 8, [1, 2, 3]));
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_prefers_file_part_over_earlier_attachment() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let image = solid_png(8, 8, [30, 90, 150]);
    let request = upload_request_with_parts(&[
        ("notes", Some("notes.txt"), b"hello".as_slice()),
        ("file", Some("a.png"), image.as_slice()),
    ]);
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let tile = decode_texture_url(json["texture_url"].as_str().unwrap());
    let p = tile.get_pixel(20, 20);
    assert!((p[0] as i32 - 30).abs() <= 4, "red was {}", p[0]);
    assert!((p[2] as i32 - 150).abs() <= 4, "blue was {}", p[2]);
}

#[tokio::test]
async fn test_upload_falls_back_to_first_attachment() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let image = solid_png(8, 8, [1, 2, 3]);
    let request = upload_request_with_parts(&[
        ("comment", None, b"not a file".as_slice()),
        ("photo", Some("photo.png"), image.as_slice()),
        ("other", Some("other.bin"), b"garbage".as_slice()),
    ]);
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_is_deterministic() {
    let data = encode_image(
        &RgbImage::from_fn(120, 80, |x, y| Rgb([(x * 2) as u8, (y * 3) as u8, 9])),
        ImageFormat::Png,
    );

    let router = test_router(StubGenerator::new(StubBehavior::NoImage));
    let first = body_json(router.clone().oneshot(upload_request(&data)).await.unwrap()).await;
    let second = body_json(router.oneshot(upload_request(&data)).await.unwrap()).await;

    assert_eq!(first["texture_url"], second["texture_url"]);
}

#[tokio::test]
async fn test_upload_with_custom_tile_size() {
    let service = TextureService::with_settings(
        StubGenerator::new(StubBehavior::NoImage),
        TileSize::new(64).unwrap(),
        TextureEncoder::with_quality(80),
    );
    let router = create_router(service, RouterConfig::new().with_tracing(false));

    let response = router
        .oneshot(upload_request(&solid_png(30, 30, [9, 9, 9])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["size"], 64);
    let tile = decode_texture_url(json["texture_url"].as_str().unwrap());
    assert_eq!(tile.dimensions(), (64, 64));
}

// =============================================================================
// Client Errors
// =============================================================================

#[tokio::test]
async fn test_upload_undecodable_bytes_is_client_error() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let response = router
        .oneshot(upload_request(b"this is not an image at all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "invalid_image");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("Invalid image file"));
}

#[tokio::test]
async fn test_upload_empty_file_is_client_error() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let response = router.oneshot(upload_request(&[])).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_image");
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let request = upload_request_with_field("comment", None, b"hello");
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "missing_file");
}

#[tokio::test]
async fn test_upload_not_multipart() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let request = Request::builder()
        .method("POST")
        .uri("/upload-texture")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_request");
}

#[tokio::test]
async fn test_upload_too_large() {
    let router = create_router(
        TextureService::new(StubGenerator::new(StubBehavior::NoImage)),
        RouterConfig::new()
            .with_tracing(false)
            .with_max_upload_bytes(1024),
    );

    let big = solid_png(8, 8, [0, 0, 0])
        .into_iter()
        .chain(std::iter::repeat(0u8).take(4096))
        .collect::<Vec<u8>>();
    let response = router.oneshot(upload_request(&big)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_wrong_method() {
    let router = test_router(StubGenerator::new(StubBehavior::NoImage));

    let request = Request::builder()
        .uri("/upload-texture")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
