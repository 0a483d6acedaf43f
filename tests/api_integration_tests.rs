//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle of the admin surface.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use playlist_cache::{api::create_router, AppState, FingerprintCache};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let cache = FingerprintCache::new(100, Duration::from_secs(300));
    create_router(AppState::new(cache))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET / LOOKUP Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({
                "kind": "playlist",
                "criteria": {"genres": ["rock", "indie"], "mood": "energetic"},
                "value": {"songs": ["Song A", "Song B"]}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);
    assert!(json["message"].as_str().unwrap().contains("successfully"));
}

#[tokio::test]
async fn test_lookup_with_reordered_criteria() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({
                "kind": "playlist",
                "criteria": {"genres": ["rock", "indie"], "mood": "energetic", "limit": 20},
                "value": {"songs": ["Song A"]}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);
    let stored = body_to_json(set_response.into_body()).await;

    // Same criteria, different field order and array order
    let response = app
        .oneshot(json_request(
            "POST",
            "/cache/lookup",
            json!({
                "kind": "playlist",
                "criteria": {"limit": 20, "mood": "energetic", "genres": ["indie", "rock"]}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], json!({"songs": ["Song A"]}));
    assert_eq!(json["fingerprint"], stored["fingerprint"]);
}

#[tokio::test]
async fn test_lookup_other_kind_is_miss() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "playlist", "criteria": {"mood": "calm"}, "value": [1, 2]}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/cache/lookup",
            json!({"kind": "trend", "criteria": {"mood": "calm"}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_lookup_without_criteria_field() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "trend", "criteria": {}, "value": "rising"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("POST", "/cache/lookup", json!({"kind": "trend"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "rising");
}

// == INVALIDATE Endpoint Tests ==

#[tokio::test]
async fn test_invalidate_endpoint() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "song_analysis", "criteria": {"songs": ["b", "a"]}, "value": {"bpm": 120}}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cache/invalidate",
            json!({"kind": "song_analysis", "criteria": {"songs": ["a", "b"]}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cache/lookup",
            json!({"kind": "song_analysis", "criteria": {"songs": ["a", "b"]}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Invalidating again is not an error
    let response = app
        .oneshot(json_request(
            "POST",
            "/cache/invalidate",
            json!({"kind": "song_analysis", "criteria": {"songs": ["a", "b"]}}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], false);
}

// == CLEAR Endpoint Tests ==

#[tokio::test]
async fn test_clear_endpoint() {
    let app = create_test_app();

    for mood in ["calm", "happy", "sad"] {
        let _ = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/cache",
                json!({"kind": "playlist", "criteria": {"mood": mood}, "value": mood}),
            ))
            .await
            .unwrap();
    }

    let response = app.clone().oneshot(empty_request("DELETE", "/cache")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"].as_u64().unwrap(), 3);

    let response = app.oneshot(empty_request("GET", "/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entry_count"].as_u64().unwrap(), 0);
    assert_eq!(json["approx_value_bytes"].as_u64().unwrap(), 0);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    // Set a value
    let _ = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "trend", "criteria": {"region": "eu"}, "value": "abc"}),
        ))
        .await
        .unwrap();

    // Lookup (hit)
    let _ = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cache/lookup",
            json!({"kind": "trend", "criteria": {"region": "eu"}}),
        ))
        .await
        .unwrap();

    // Lookup (miss)
    let _ = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/cache/lookup",
            json!({"kind": "trend", "criteria": {"region": "us"}}),
        ))
        .await
        .unwrap();

    let response = app.oneshot(empty_request("GET", "/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["entry_count"].as_u64().unwrap(), 1);
    assert_eq!(json["approx_key_bytes"].as_u64().unwrap(), 64);
    // "abc" serialized with quotes
    assert_eq!(json["approx_value_bytes"].as_u64().unwrap(), 5);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum rejects malformed bodies before the handler runs
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_kind_request() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "", "criteria": {}, "value": "test"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    // Set a value with 1 second TTL
    let set_response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "playlist", "criteria": {"mood": "brief"}, "value": "expires_soon", "ttl": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let lookup = json!({"kind": "playlist", "criteria": {"mood": "brief"}});

    // Verify it exists immediately
    let response = app
        .clone()
        .oneshot(json_request("POST", "/cache/lookup", lookup.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/cache/lookup", lookup))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(empty_request("GET", "/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["expirations"].as_u64().unwrap(), 1);
    assert_eq!(json["entry_count"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn test_zero_ttl_never_expires() {
    let cache = FingerprintCache::new(100, Duration::from_millis(50));
    let app = create_router(AppState::new(cache));

    let _ = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "trend", "criteria": {}, "value": 1, "ttl": 0}),
        ))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = app
        .oneshot(json_request("POST", "/cache/lookup", json!({"kind": "trend", "criteria": {}})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_huge_ttl_is_kept() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/cache",
            json!({"kind": "trend", "criteria": {}, "value": 1, "ttl": 18_446_744_073_709_552u64}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = app
        .oneshot(json_request("POST", "/cache/lookup", json!({"kind": "trend", "criteria": {}})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
