//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use scribe::db::repositories::LocalRepository;
use scribe::db::repository::FullRepository;
use scribe::http::{create_router, AppState};

/// Build a router around a fresh in-memory repository.
///
/// Each test gets its own storage scope that is dropped on exit whether the
/// test passes or fails, so tests never observe each other's rows.
pub fn test_app() -> Router {
    let repository = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repository))
}

/// Drive one request through the router and decode the JSON response body.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, value)
}

/// Create a post through the API and return its id.
pub async fn create_post(app: &Router, title: &str, body_text: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/posts/",
        Some(serde_json::json!({"title": title, "body": body_text})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create_post failed: {}", body);
    body["post"]["id"].as_i64().expect("post id")
}

/// Create a user through the API and return its id.
pub async fn create_user(app: &Router, name: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/users/",
        Some(serde_json::json!({"name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create_user failed: {}", body);
    body["user"]["id"].as_i64().expect("user id")
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// `Some(v)` sets the variable, `None` removes it. The previous values are
/// restored on exit (including on panic), and access is serialized because
/// the process environment is shared across test threads.
pub fn with_scoped_env<R>(changes: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    struct Restore(Vec<(String, Option<String>)>);

    impl Drop for Restore {
        fn drop(&mut self) {
            for (key, value) in self.0.drain(..) {
                match value {
                    Some(v) => std::env::set_var(&key, v),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }

    let _restore = Restore(
        changes
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect(),
    );

    for (key, value) in changes {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }

    f()
}
