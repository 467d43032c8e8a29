//! Shared helpers for API integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use pulseboard_api::auth::jwt::{issue_token, JwtConfig};
use pulseboard_api::config::ServerConfig;
use pulseboard_api::routes;
use pulseboard_api::state::AppState;
use pulseboard_store::{DynStore, MemoryStore};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with the production middleware stack
/// over a fresh in-memory store.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware (request ID, timeout, panic recovery, CORS)
/// that production uses.
pub fn build_test_app() -> Router {
    let store: DynStore = Arc::new(MemoryStore::new());
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    routes::app(state)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
}

/// Mint a Bearer token for the given owner with the test secret.
pub fn bearer(owner_id: &str) -> String {
    let token = issue_token(&owner_id.to_string(), &test_config().jwt)
        .expect("token generation should succeed");
    format!("Bearer {token}")
}

/// Send one request through the router. `auth` is a full `Bearer ...`
/// header value; `body` is serialized as JSON when present.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request build"),
        None => builder.body(Body::empty()).expect("request build"),
    };
    app.clone()
        .oneshot(request)
        .await
        .expect("router must produce a response")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body must be valid JSON")
}
