//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, send};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok() {
    let app = build_test_app();
    let response = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

// ---------------------------------------------------------------------------
// Test: unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = send(&app, Method::GET, "/this-route-does-not-exist", None, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let response = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}
