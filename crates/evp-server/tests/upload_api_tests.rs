//! Upload API integration tests
//!
//! Drive the upload and status endpoints through the feature router with an
//! instant mock validator and an in-memory session store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use evp_pipeline::store::MemoryStore;
use evp_pipeline::validate::MockEmailValidator;
use evp_pipeline::SessionManager;
use evp_server::features::{self, FeatureState};

const BOUNDARY: &str = "evp-test-boundary";

fn test_app() -> Router {
    let manager = Arc::new(SessionManager::new(
        Arc::new(MockEmailValidator::new(Duration::ZERO)),
        Arc::new(MemoryStore::new()),
    ));

    Router::new().nest("/api/v1", features::router(FeatureState { manager }))
}

fn upload_request(csv: &str, file_content_type: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"emails.csv\"\r\n\
         Content-Type: {file_content_type}\r\n\
         \r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri("/api/v1/uploads")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_with_valid_rows_returns_clean_report() {
    let app = test_app();
    let csv = "name,email\nAlice,alice@x.com\nBob,bob@x.com";

    let response = app.oneshot(upload_request(csv, "text/csv")).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["total_records"], 2);
    assert_eq!(json["data"]["processed_records"], 2);
    assert_eq!(json["data"]["failed_records"], 0);
    assert_eq!(json["data"]["details"].as_array().unwrap().len(), 0);
    assert!(json["data"]["session_id"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_upload_with_invalid_rows_reports_failure_details() {
    let app = test_app();
    let csv = "name,email\n,c@x.com\nD,dgmail.com";

    let response = app.oneshot(upload_request(csv, "text/csv")).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_records"], 2);
    assert_eq!(json["data"]["processed_records"], 0);
    assert_eq!(json["data"]["failed_records"], 2);

    // Detail order depends on validation completion order
    let mut errors: Vec<&str> = json["data"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["error"].as_str().unwrap())
        .collect();
    errors.sort_unstable();
    assert_eq!(errors, vec!["Invalid email address", "Name field is empty"]);
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let app = test_app();
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"notes\"\r\n\
         \r\n\
         not a file\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/uploads")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NO_FILE");
}

#[tokio::test]
async fn test_upload_with_wrong_content_type_is_rejected() {
    let app = test_app();

    let response = app
        .oneshot(upload_request("name,email\nAlice,alice@x.com", "text/plain"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_FILE_TYPE");
}

#[tokio::test]
async fn test_upload_with_bad_headers_is_a_client_fault() {
    let app = test_app();

    let response = app
        .oneshot(upload_request("foo,bar\na,b@x.com", "text/csv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_CSV_HEADERS");
}

#[tokio::test]
async fn test_status_of_completed_session_is_idempotent() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(upload_request("name,email\nAlice,alice@x.com", "text/csv"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let session_id = body_json(response).await["data"]["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/uploads/{session_id}/status"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["session_id"], session_id.as_str());
        assert_eq!(json["data"]["progress"], "100%");
    }
}

#[tokio::test]
async fn test_status_of_unknown_session_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/uploads/never-issued/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}
