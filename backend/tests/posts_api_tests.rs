//! HTTP integration tests for the post endpoints.

mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{create_post, create_user, request, test_app};

#[tokio::test]
async fn create_post_returns_the_mapped_dto() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/posts/",
        Some(json!({"title": "New Title", "body": "New Body"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "New Title");
    assert_eq!(body["post"]["body"], "New Body");
    assert!(body["post"]["id"].as_i64().unwrap() >= 1);
    assert!(body["post"]["user_id"].is_null());
    // Live rows never expose the soft-delete marker.
    assert!(body["post"].get("deleted_at").is_none());
    // RFC 3339 with a Z suffix, e.g. "2023-01-01T00:00:00Z"
    assert!(body["post"]["created_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn create_post_with_empty_fields_is_rejected() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/posts/",
        Some(json!({"title": "", "body": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // The failed create never reached storage.
    let (status, body) = request(&app, "GET", "/posts/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_post_with_non_positive_user_id_is_rejected() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "POST",
        "/posts/",
        Some(json!({"title": "t", "body": "b", "user_id": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_id must be a positive integer");
}

#[tokio::test]
async fn show_round_trips_the_created_post() {
    let app = test_app();
    let id = create_post(&app, "Seeded", "From test").await;

    let (status, body) = request(&app, "GET", &format!("/posts/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["id"].as_i64().unwrap(), id);
    assert_eq!(body["post"]["title"], "Seeded");
    assert_eq!(body["post"]["body"], "From test");
}

#[tokio::test]
async fn show_missing_post_is_not_found() {
    let app = test_app();

    let (status, body) = request(&app, "GET", "/posts/99999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unable to find a post");
}

#[tokio::test]
async fn listing_grows_with_each_created_post() {
    let app = test_app();
    for i in 0..3 {
        create_post(&app, &format!("Title {}", i), &format!("Body {}", i)).await;
    }

    let (status, body) = request(&app, "GET", "/posts/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["posts"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn update_replaces_present_fields() {
    let app = test_app();
    let id = create_post(&app, "Temp", "Temp").await;

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/posts/{}", id),
        Some(json!({"title": "Updated", "body": "Updated Body"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Updated");
    assert_eq!(body["post"]["body"], "Updated Body");
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
    let app = test_app();

    let (status, body) = request(
        &app,
        "PATCH",
        "/posts/99999",
        Some(json!({"title": "Updated", "body": "Updated Body"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unable to update a post");
}

#[tokio::test]
async fn update_with_empty_strings_changes_nothing() {
    let app = test_app();
    let id = create_post(&app, "Original", "Original Body").await;

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/posts/{}", id),
        Some(json!({"title": "", "body": ""})),
    )
    .await;

    // Empty strings mean "leave unchanged", and an empty update set is
    // still a success.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Original");
    assert_eq!(body["post"]["body"], "Original Body");

    let (_, body) = request(&app, "GET", &format!("/posts/{}", id), None).await;
    assert_eq!(body["post"]["title"], "Original");
    assert_eq!(body["post"]["body"], "Original Body");
}

#[tokio::test]
async fn update_applies_user_id_only_when_present() {
    let app = test_app();
    let user_id = create_user(&app, "Owner").await;
    let id = create_post(&app, "Owned", "Body").await;

    // Set the owner.
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/posts/{}", id),
        Some(json!({"user_id": user_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["user_id"].as_i64().unwrap(), user_id);

    // A body without the field leaves the owner alone.
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/posts/{}", id),
        Some(json!({"title": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["user_id"].as_i64().unwrap(), user_id);

    // An explicit null clears it.
    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/posts/{}", id),
        Some(json!({"user_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["post"]["user_id"].is_null());
}

#[tokio::test]
async fn delete_confirms_and_hides_the_post() {
    let app = test_app();
    let id = create_post(&app, "Temp", "Temp").await;

    let (status, body) = request(&app, "DELETE", &format!("/posts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id has been deleted"], id.to_string());

    // Soft-deleted rows are invisible to show...
    let (status, body) = request(&app, "GET", &format!("/posts/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unable to find a post");

    // ...and to the listing.
    let (_, body) = request(&app, "GET", "/posts/", None).await;
    assert!(body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["id"].as_i64().unwrap() != id));
}

#[tokio::test]
async fn delete_missing_post_is_not_found() {
    let app = test_app();

    let (status, body) = request(&app, "DELETE", "/posts/99999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Unable to delete a post");
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() {
    let app = test_app();
    let id = create_post(&app, "Once", "Only").await;

    let (status, _) = request(&app, "DELETE", &format!("/posts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(&app, "DELETE", &format!("/posts/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
