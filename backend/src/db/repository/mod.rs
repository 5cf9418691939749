//! Repository trait definitions.
//!
//! The traits below are the storage contract the HTTP layer programs
//! against. Implementations live in [`crate::db::repositories`]; handlers
//! only ever see `Arc<dyn FullRepository>`.
//!
//! Every lookup operates on live rows only: a row whose `deleted_at` is set
//! is invisible to `get_*`/`list_*` and cannot be updated or deleted again.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{NewPost, NewUser, Post, PostChanges, PostId, User, UserId};

/// Storage operations for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. The backend assigns id and timestamps.
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User>;

    /// Fetch a live user by primary key.
    async fn get_user(&self, id: UserId) -> RepositoryResult<User>;
}

/// Storage operations for posts.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post. The backend assigns id and timestamps.
    async fn create_post(&self, new_post: NewPost) -> RepositoryResult<Post>;

    /// Insert a batch of posts in one storage call.
    ///
    /// Used for nested post creation at user-creation time. There is no
    /// transactional coupling with the preceding user insert.
    async fn create_posts(&self, new_posts: Vec<NewPost>) -> RepositoryResult<Vec<Post>>;

    /// Fetch a live post by primary key.
    async fn get_post(&self, id: PostId) -> RepositoryResult<Post>;

    /// List all live posts in storage order. Callers must treat the order
    /// as unspecified.
    async fn list_posts(&self) -> RepositoryResult<Vec<Post>>;

    /// List all live posts owned by the given user.
    async fn list_posts_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Post>>;

    /// Apply an update set to a live post and return the resulting row.
    ///
    /// An empty update set is a no-op that still returns the row. A missing
    /// or soft-deleted post yields a not-found error and no mutation.
    async fn update_post(&self, id: PostId, changes: PostChanges) -> RepositoryResult<Post>;

    /// Soft-delete a live post by setting its `deleted_at` marker.
    async fn soft_delete_post(&self, id: PostId) -> RepositoryResult<()>;
}

/// The complete storage contract handlers depend on.
#[async_trait]
pub trait FullRepository: UserRepository + PostRepository {
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
