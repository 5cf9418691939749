//! OpenAPI documentation for the REST API.
//!
//! The document is generated from the `#[utoipa::path]` annotations on the
//! handlers and served as JSON at `GET /openapi.json`.

use axum::Json;
use utoipa::OpenApi;

use super::dto::{
    CreatePostRequest, CreateUserRequest, HealthResponse, NewPostSpec, PostDeletedResponse,
    PostDto, PostResponse, PostsResponse, UpdatePostRequest, UserDto, UserPostsResponse,
    UserResponse,
};
use super::error::ErrorBody;
use super::handlers;

/// Aggregate OpenAPI document for every endpoint.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scribe REST API",
        description = "A simple REST API for managing posts and users",
        version = "1.0.0",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::create_post,
        handlers::list_posts,
        handlers::get_post,
        handlers::update_post,
        handlers::delete_post,
        handlers::create_user,
        handlers::get_user,
        handlers::get_user_posts,
        handlers::health_check,
    ),
    components(schemas(
        PostDto,
        UserDto,
        CreatePostRequest,
        UpdatePostRequest,
        NewPostSpec,
        CreateUserRequest,
        PostResponse,
        PostsResponse,
        UserResponse,
        UserPostsResponse,
        PostDeletedResponse,
        HealthResponse,
        ErrorBody,
    )),
    tags(
        (name = "posts", description = "Blog post management"),
        (name = "users", description = "User management"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document.
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
