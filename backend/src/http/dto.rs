//! Data Transfer Objects for the HTTP API.
//!
//! These are the wire shapes: timestamps become RFC 3339 strings, the
//! soft-delete marker is omitted unless set, and every response payload is
//! wrapped in an entity-named envelope (`post`, `posts`, `user`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::models::{Post, PostChanges, User, UserId};

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Wire representation of a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "2023-01-01T00:00:00Z")]
    pub created_at: String,
    #[schema(example = "2023-01-01T00:00:00Z")]
    pub updated_at: String,
    /// Present only for soft-deleted rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[schema(example = "My First Post")]
    pub title: String,
    #[schema(example = "This is the content of my first post")]
    pub body: String,
    /// Owning user, if any
    #[schema(example = 1)]
    pub user_id: Option<i64>,
}

/// Wire representation of a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "2023-01-01T00:00:00Z")]
    pub created_at: String,
    #[schema(example = "2023-01-01T00:00:00Z")]
    pub updated_at: String,
    /// Present only for soft-deleted rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[schema(example = "John Doe")]
    pub name: String,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        PostDto {
            id: post.id.value(),
            created_at: format_timestamp(post.created_at),
            updated_at: format_timestamp(post.updated_at),
            deleted_at: post.deleted_at.map(format_timestamp),
            title: post.title,
            body: post.body,
            user_id: post.user_id.map(|id| id.value()),
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id.value(),
            created_at: format_timestamp(user.created_at),
            updated_at: format_timestamp(user.updated_at),
            deleted_at: user.deleted_at.map(format_timestamp),
            name: user.name,
        }
    }
}

/// Request body for creating a post.
///
/// Fields default to empty so that "missing" and "empty" fail validation the
/// same way, with a 400 and a field-specific message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[schema(example = "My First Post")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "This is the content of my first post")]
    pub body: String,
    /// Owning user; when present it must be a positive id. Existence is left
    /// to the storage constraint.
    #[serde(default)]
    #[schema(example = 1)]
    pub user_id: Option<i64>,
}

/// Post fields for nested creation on `POST /users/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewPostSpec {
    #[serde(default)]
    #[schema(example = "Hello")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "World")]
    pub body: String,
}

/// Request body for creating a user, optionally with nested posts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[schema(example = "John Doe")]
    pub name: String,
    /// Posts to create for the new user after it is persisted
    #[serde(default)]
    pub posts: Vec<NewPostSpec>,
}

/// Request body for updating a post.
///
/// `title`/`body`: absent or empty string both mean "leave unchanged" —
/// there is no API-level way to set either to the empty string.
/// `user_id` distinguishes absent (leave unchanged) from explicit `null`
/// (clear the owner) from a number (set the owner).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    #[serde(default)]
    #[schema(example = "Updated Post Title")]
    pub title: Option<String>,
    #[serde(default)]
    #[schema(example = "Updated post content")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>, example = 2)]
    pub user_id: Option<Option<i64>>,
}

/// Maps a present-but-null JSON value to `Some(None)` while `serde(default)`
/// keeps an absent field at `None`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

impl UpdatePostRequest {
    /// Compute the update set under the empty-string quirk.
    pub fn into_changes(self) -> PostChanges {
        PostChanges {
            title: self.title.filter(|t| !t.is_empty()),
            body: self.body.filter(|b| !b.is_empty()),
            user_id: self.user_id.map(|inner| inner.map(UserId::new)),
        }
    }
}

/// Response envelope for a single post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub post: PostDto,
}

/// Response envelope for post listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostsResponse {
    pub posts: Vec<PostDto>,
}

/// Response envelope for a single user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: UserDto,
}

/// Response envelope for a user together with their posts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPostsResponse {
    pub user: UserDto,
    pub posts: Vec<PostDto>,
}

/// Confirmation envelope for a soft-deleted post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostDeletedResponse {
    /// The deleted id, echoed back as a string
    #[serde(rename = "id has been deleted")]
    #[schema(example = "1")]
    pub id: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Status of the service
    #[schema(example = "ok")]
    pub status: String,
    /// Database connection status
    #[schema(example = "connected")]
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_absent_user_id_is_no_change() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(req.user_id, None);
    }

    #[test]
    fn update_request_null_user_id_clears_owner() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"user_id":null}"#).unwrap();
        assert_eq!(req.user_id, Some(None));

        let changes = req.into_changes();
        assert_eq!(changes.user_id, Some(None));
    }

    #[test]
    fn update_request_numeric_user_id_sets_owner() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"user_id":7}"#).unwrap();
        assert_eq!(req.user_id, Some(Some(7)));
    }

    #[test]
    fn empty_title_and_body_drop_out_of_the_update_set() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"title":"","body":""}"#).unwrap();
        let changes = req.into_changes();
        assert!(changes.is_empty());
    }

    #[test]
    fn deleted_at_is_omitted_for_live_rows() {
        let dto = PostDto {
            id: 1,
            created_at: "2023-01-01T00:00:00Z".to_string(),
            updated_at: "2023-01-01T00:00:00Z".to_string(),
            deleted_at: None,
            title: "t".to_string(),
            body: "b".to_string(),
            user_id: None,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("deleted_at").is_none());
        assert!(json.get("user_id").unwrap().is_null());
    }
}
