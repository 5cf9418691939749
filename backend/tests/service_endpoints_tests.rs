//! Tests for the health check and the generated API documentation.

mod support;

use axum::http::StatusCode;

use support::{request, test_app};

#[tokio::test]
async fn health_reports_ok_with_a_connected_store() {
    let app = test_app();

    let (status, body) = request(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn openapi_document_describes_the_api() {
    let app = test_app();

    let (status, body) = request(&app, "GET", "/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].as_str().unwrap().starts_with("3."));
    assert_eq!(body["info"]["title"], "Scribe REST API");

    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/posts/"));
    assert!(paths.contains_key("/posts/{id}"));
    assert!(paths.contains_key("/users/{id}/posts"));
}
