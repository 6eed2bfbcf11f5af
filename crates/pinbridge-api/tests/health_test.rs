//! Health, listing and documentation endpoint tests.
//!
//! Run with: `cargo test -p pinbridge-api --test health_test`

mod helpers;

use helpers::fixtures::{create_minimal_png, file_form};
use helpers::setup_test_app;
use pinbridge_storage::StagingArea;
use serde_json::Value;

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["pinataConnected"], true);
}

#[tokio::test]
async fn test_health_generates_request_id() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    let request_id = response.header("X-Request-ID");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn test_files_lists_staging_directory() {
    let app = setup_test_app().await;
    std::fs::write(app.staging.root().join("leftover.txt"), b"x").unwrap();

    let response = app.client().get("/files").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["files"], serde_json::json!(["leftover.txt"]));
}

#[tokio::test]
async fn test_files_is_empty_after_upload() {
    let app = setup_test_app().await;

    let upload = app
        .client()
        .post("/upload")
        .multipart(file_form("a.png", "image/png", create_minimal_png()))
        .await;
    assert_eq!(upload.status_code(), 200);

    let response = app.client().get("/files").await;
    let body: Value = response.json();
    assert_eq!(body["files"], serde_json::json!([]));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"].get("/upload").is_some());
    assert!(body["paths"].get("/health").is_some());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/nope").await;

    assert_eq!(response.status_code(), 404);
}
