//! Integration tests for the anonymous share-token surface.

mod common;

use axum::http::{Method, StatusCode};
use common::{bearer, body_json, build_test_app, send};
use serde_json::json;

/// Create a project as `owner` and return `(id, public_id)`.
async fn seed_project(app: &axum::Router, owner: &str, name: &str) -> (String, String) {
    let auth = bearer(owner);
    let created = send(
        app,
        Method::POST,
        "/api/v1/projects",
        Some(&auth),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = body_json(created).await;
    (
        body["data"]["id"].as_str().unwrap().to_string(),
        body["data"]["public_id"].as_str().unwrap().to_string(),
    )
}

// ---------------------------------------------------------------------------
// Test: the share token reads the project without credentials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_read_needs_no_credentials() {
    let app = build_test_app();
    let (project_id, public_id) = seed_project(&app, "alice", "Shared").await;

    let auth = bearer("alice");
    send(
        &app,
        Method::POST,
        &format!("/api/v1/projects/{project_id}/tasks"),
        Some(&auth),
        Some(json!({ "title": "One", "status": "completed" })),
    )
    .await;
    send(
        &app,
        Method::POST,
        &format!("/api/v1/projects/{project_id}/tasks"),
        Some(&auth),
        Some(json!({ "title": "Two" })),
    )
    .await;

    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/public/projects/{public_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let detail = &body["data"];
    assert_eq!(detail["project"]["name"], "Shared");
    assert_eq!(detail["tasks"].as_array().unwrap().len(), 2);
    // 1 of 2 completed, live-computed.
    assert_eq!(detail["progress"]["source"], "live");
    assert_eq!(detail["progress"]["percent"], 50);
}

// ---------------------------------------------------------------------------
// Test: the public projection never leaks owner identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_read_hides_owner_fields() {
    let app = build_test_app();
    let (_, public_id) = seed_project(&app, "alice", "Shared").await;

    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/public/projects/{public_id}"),
        None,
        None,
    )
    .await;
    let body = body_json(response).await;
    let project = body["data"]["project"].as_object().unwrap();

    assert!(!project.contains_key("owner_id"));
    assert!(!project.contains_key("client_email"));
    assert!(!project.contains_key("client_name"));
    assert!(!project.contains_key("id"));
    assert!(project.contains_key("public_id"));
}

// ---------------------------------------------------------------------------
// Test: an unknown token is 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_token_is_404() {
    let app = build_test_app();

    let response = send(
        &app,
        Method::GET,
        "/api/v1/public/projects/nOsUcHtOkEn000000000000x",
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: the internal project id is not a usable share token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_id_is_not_a_share_token() {
    let app = build_test_app();
    let (project_id, _) = seed_project(&app, "alice", "Opaque").await;

    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/public/projects/{project_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: the public surface carries no mutation capability
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mutations_are_not_reachable_anonymously() {
    let app = build_test_app();
    let (project_id, public_id) = seed_project(&app, "alice", "Read only").await;

    // The owner routes reject anonymous calls outright.
    let response = send(
        &app,
        Method::PUT,
        &format!("/api/v1/projects/{project_id}"),
        None,
        Some(json!({ "name": "Defaced" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/projects/{project_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // And there is no write route under /public at all.
    let response = send(
        &app,
        Method::PUT,
        &format!("/api/v1/public/projects/{public_id}"),
        None,
        Some(json!({ "name": "Defaced" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Test: deletion makes the token unresolvable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deleted_project_token_is_404() {
    let app = build_test_app();
    let (project_id, public_id) = seed_project(&app, "alice", "Ephemeral").await;

    let auth = bearer("alice");
    let deleted = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/projects/{project_id}"),
        Some(&auth),
        None,
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        Method::GET,
        &format!("/api/v1/public/projects/{public_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
