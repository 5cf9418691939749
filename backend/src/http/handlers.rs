//! HTTP handlers for the REST API.
//!
//! One handler per (entity, operation) pair. Each handler validates its
//! input, talks to the repository, maps rows to DTOs, and returns either the
//! enveloped payload or an [`AppError`]. Validation failures never touch
//! storage.

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{
    CreatePostRequest, CreateUserRequest, HealthResponse, PostDeletedResponse, PostResponse,
    PostsResponse, UpdatePostRequest, UserPostsResponse, UserResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{NewPost, NewUser, PostId, UserId};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// Health check endpoint to verify the service is running and storage is
/// reachable.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database,
    }))
}

// =============================================================================
// Posts
// =============================================================================

/// Create a new blog post, optionally owned by a user via `user_id`.
#[utoipa::path(
    post,
    path = "/posts/",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Post created successfully", body = PostResponse),
        (status = 400, description = "Missing title/body or storage rejection", body = super::error::ErrorBody)
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<CreatePostRequest>,
) -> HandlerResult<PostResponse> {
    if body.title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if body.body.is_empty() {
        return Err(AppError::Validation("body is required".to_string()));
    }
    if let Some(user_id) = body.user_id {
        // Existence of the referenced user is left to the storage constraint.
        if user_id < 1 {
            return Err(AppError::Validation(
                "user_id must be a positive integer".to_string(),
            ));
        }
    }

    let post = state
        .repository
        .create_post(NewPost {
            title: body.title,
            body: body.body,
            user_id: body.user_id.map(UserId::new),
        })
        .await?;

    Ok(Json(PostResponse { post: post.into() }))
}

/// List all live posts.
#[utoipa::path(
    get,
    path = "/posts/",
    tag = "posts",
    responses(
        (status = 200, description = "List of posts", body = PostsResponse)
    )
)]
pub async fn list_posts(State(state): State<AppState>) -> HandlerResult<PostsResponse> {
    let posts = state.repository.list_posts().await?;

    Ok(Json(PostsResponse {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// Get a specific post by its id.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post found", body = PostResponse),
        (status = 404, description = "Post not found", body = super::error::ErrorBody)
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<PostResponse> {
    let post = state
        .repository
        .get_post(PostId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "Unable to find a post"))?;

    Ok(Json(PostResponse { post: post.into() }))
}

/// Update an existing post.
///
/// Empty `title`/`body` strings mean "leave unchanged"; `user_id` is only
/// applied when the field is present, with `null` clearing the owner.
#[utoipa::path(
    patch,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated successfully", body = PostResponse),
        (status = 400, description = "Invalid request", body = super::error::ErrorBody),
        (status = 404, description = "Post not found", body = super::error::ErrorBody)
    )
)]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePostRequest>,
) -> HandlerResult<PostResponse> {
    if let Some(Some(user_id)) = body.user_id {
        if user_id < 1 {
            return Err(AppError::Validation(
                "user_id must be a positive integer".to_string(),
            ));
        }
    }

    let post = state
        .repository
        .update_post(PostId::new(id), body.into_changes())
        .await
        .map_err(|e| AppError::lookup(e, "Unable to update a post"))?;

    Ok(Json(PostResponse { post: post.into() }))
}

/// Soft-delete a post by id.
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted successfully", body = PostDeletedResponse),
        (status = 404, description = "Post not found", body = super::error::ErrorBody)
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<PostDeletedResponse> {
    state
        .repository
        .soft_delete_post(PostId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "Unable to delete a post"))?;

    Ok(Json(PostDeletedResponse { id: id.to_string() }))
}

// =============================================================================
// Users
// =============================================================================

/// Create a new user, optionally with a batch of nested posts.
#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Missing name or nested-post failure", body = super::error::ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> HandlerResult<UserResponse> {
    if body.name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    for spec in &body.posts {
        if spec.title.is_empty() || spec.body.is_empty() {
            return Err(AppError::Validation(
                "nested posts require title and body".to_string(),
            ));
        }
    }

    let user = state
        .repository
        .create_user(NewUser { name: body.name })
        .await?;

    if !body.posts.is_empty() {
        let new_posts = body
            .posts
            .into_iter()
            .map(|spec| NewPost {
                title: spec.title,
                body: spec.body,
                user_id: Some(user.id),
            })
            .collect();

        // The user row is already committed at this point. A batch failure
        // fails the whole request and leaves the user without its posts —
        // a known inconsistency window, kept as observed behavior.
        state.repository.create_posts(new_posts).await?;
    }

    Ok(Json(UserResponse { user: user.into() }))
}

/// Get a specific user by their id.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = super::error::ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<UserResponse> {
    let user = state
        .repository
        .get_user(UserId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "User not found"))?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// Get a user together with all their posts.
///
/// An empty post list for an existing user is a success, not a not-found.
#[utoipa::path(
    get,
    path = "/users/{id}/posts",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User posts found", body = UserPostsResponse),
        (status = 404, description = "User not found", body = super::error::ErrorBody)
    )
)]
pub async fn get_user_posts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<UserPostsResponse> {
    let user = state
        .repository
        .get_user(UserId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "User not found"))?;

    let posts = state.repository.list_posts_for_user(user.id).await?;

    Ok(Json(UserPostsResponse {
        user: user.into(),
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}
