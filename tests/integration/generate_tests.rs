//! Generation integration tests.
//!
//! Tests verify:
//! - Prompt-based texture creation through a stub provider
//! - Determinism for a fixed seed
//! - Provider failures, empty results and undecodable images map to 500
//! - Request validation (missing prompt, bad seed, malformed JSON)

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use texture_tiler::source::DEFAULT_NEGATIVE_PROMPT;

use super::test_utils::{
    body_json, decode_texture_url, generate_request, test_router, StubBehavior, StubGenerator,
};

// =============================================================================
// Successful Generation
// =============================================================================

#[tokio::test]
async fn test_generate_returns_texture_and_prompt() {
    let generator = StubGenerator::new(StubBehavior::SeededImage);
    let router = test_router(generator.clone());

    let response = router
        .oneshot(generate_request(json!({"prompt": "weathered oak planks"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["size"], 256);
    assert_eq!(json["prompt"], "weathered oak planks");

    let tile = decode_texture_url(json["texture_url"].as_str().unwrap());
    assert_eq!(tile.dimensions(), (256, 256));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_generate_sends_enhanced_prompt_and_defaults() {
    let generator = StubGenerator::new(StubBehavior::SeededImage);
    let router = test_router(generator.clone());

    let response = router
        .oneshot(generate_request(json!({"prompt": "terracotta tiles"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = generator.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].prompt,
        "terracotta tiles, seamless texture, tileable pattern, high quality, detailed"
    );
    assert_eq!(requests[0].negative_prompt, DEFAULT_NEGATIVE_PROMPT);
    assert_eq!(requests[0].seed, None);
}

#[tokio::test]
async fn test_generate_forwards_negative_prompt_and_seed() {
    let generator = StubGenerator::new(StubBehavior::SeededImage);
    let router = test_router(generator.clone());

    let response = router
        .oneshot(generate_request(json!({
            "prompt": "lava rock",
            "negative_prompt": "people, faces",
            "seed": 99
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = generator.requests().await;
    assert_eq!(requests[0].negative_prompt, "people, faces");
    assert_eq!(requests[0].seed, Some(99));
}

#[tokio::test]
async fn test_generate_fixed_seed_is_deterministic() {
    let router = test_router(StubGenerator::new(StubBehavior::SeededImage));
    let body = json!({"prompt": "granite", "seed": 1234});

    let first = body_json(
        router
            .clone()
            .oneshot(generate_request(body.clone()))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(router.oneshot(generate_request(body)).await.unwrap()).await;

    assert_eq!(first["success"], true);
    assert_eq!(first["texture_url"], second["texture_url"]);
}

#[tokio::test]
async fn test_generate_different_seeds_differ() {
    let router = test_router(StubGenerator::new(StubBehavior::SeededImage));

    let a = body_json(
        router
            .clone()
            .oneshot(generate_request(json!({"prompt": "granite", "seed": 1})))
            .await
            .unwrap(),
    )
    .await;
    let b = body_json(
        router
            .oneshot(generate_request(json!({"prompt": "granite", "seed": 2})))
            .await
            .unwrap(),
    )
    .await;

    assert_ne!(a["texture_url"], b["texture_url"]);
}

// =============================================================================
// Provider Failures
// =============================================================================

#[tokio::test]
async fn test_generate_no_image_is_server_error() {
    let generator = StubGenerator::new(StubBehavior::NoImage);
    let router = test_router(generator.clone());

    let response = router
        .oneshot(generate_request(json!({"prompt": "moss"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "no_image_generated");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("No image generated"));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_generate_provider_error_carries_message() {
    let router = test_router(StubGenerator::new(StubBehavior::ProviderError {
        code: "ValidationException".to_string(),
        message: "This request has been blocked by our content filters.".to_string(),
    }));

    let response = router
        .oneshot(generate_request(json!({"prompt": "moss"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "provider_error");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("This request has been blocked by our content filters."));
}

#[tokio::test]
async fn test_generate_undecodable_image_is_server_error() {
    let router = test_router(StubGenerator::new(StubBehavior::Garbage));

    let response = router
        .oneshot(generate_request(json!({"prompt": "moss"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_generated_image");
    assert_eq!(json["message"], "Failed to decode generated image");
}

// =============================================================================
// Request Validation
// =============================================================================

#[tokio::test]
async fn test_generate_missing_prompt() {
    let generator = StubGenerator::new(StubBehavior::SeededImage);
    let router = test_router(generator.clone());

    let response = router
        .oneshot(generate_request(json!({"seed": 5})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "missing_prompt");
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generate_blank_prompt() {
    let router = test_router(StubGenerator::new(StubBehavior::SeededImage));

    let response = router
        .oneshot(generate_request(json!({"prompt": "   "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_negative_seed() {
    let generator = StubGenerator::new(StubBehavior::SeededImage);
    let router = test_router(generator.clone());

    let response = router
        .oneshot(generate_request(json!({"prompt": "sand", "seed": -1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_seed");
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generate_malformed_json() {
    let router = test_router(StubGenerator::new(StubBehavior::SeededImage));

    let request = Request::builder()
        .method("POST")
        .uri("/generate-tile")
        .header("content-type", "application/json")
        .body(Body::from("{\"prompt\": "))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "invalid_request");
}

#[tokio::test]
async fn test_generate_wrong_prompt_type() {
    let router = test_router(StubGenerator::new(StubBehavior::SeededImage));

    let response = router
        .oneshot(generate_request(json!({"prompt": 42})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_missing_content_type() {
    let router = test_router(StubGenerator::new(StubBehavior::SeededImage));

    let request = Request::builder()
        .method("POST")
        .uri("/generate-tile")
        .body(Body::from(r#"{"prompt": "sand"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
