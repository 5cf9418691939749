//! In-memory repository implementation.
//!
//! Mirrors the Postgres backend's observable behavior closely enough that
//! the HTTP layer cannot tell them apart: sequential ids starting at 1,
//! timestamps assigned on insert, soft-deleted rows invisible to every
//! default query. Tests build a fresh instance per test, which gives each
//! test an isolated storage scope that is dropped on exit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::db::repository::{
    ErrorContext, FullRepository, PostRepository, RepositoryError, RepositoryResult,
    UserRepository,
};
use crate::models::{NewPost, NewUser, Post, PostChanges, PostId, User, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    next_user_id: i64,
    next_post_id: i64,
}

impl Tables {
    fn insert_post(&mut self, new_post: NewPost) -> Post {
        self.next_post_id += 1;
        let now = Utc::now();
        let post = Post {
            id: PostId::new(self.next_post_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            title: new_post.title,
            body: new_post.body,
            user_id: new_post.user_id,
        };
        self.posts.insert(post.id.value(), post.clone());
        post
    }

    fn live_post_mut(&mut self, id: PostId) -> Option<&mut Post> {
        self.posts
            .get_mut(&id.value())
            .filter(|p| p.deleted_at.is_none())
    }
}

/// Thread-safe in-memory repository.
#[derive(Debug, Default)]
pub struct LocalRepository {
    tables: RwLock<Tables>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(entity: &str, operation: &str, id: i64) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("{} not found", entity),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User> {
        let mut tables = self.tables.write();
        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(tables.next_user_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: new_user.name,
        };
        tables.users.insert(user.id.value(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> RepositoryResult<User> {
        self.tables
            .read()
            .users
            .get(&id.value())
            .filter(|u| u.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| not_found("user", "get_user", id.value()))
    }
}

#[async_trait]
impl PostRepository for LocalRepository {
    async fn create_post(&self, new_post: NewPost) -> RepositoryResult<Post> {
        Ok(self.tables.write().insert_post(new_post))
    }

    async fn create_posts(&self, new_posts: Vec<NewPost>) -> RepositoryResult<Vec<Post>> {
        let mut tables = self.tables.write();
        Ok(new_posts
            .into_iter()
            .map(|p| tables.insert_post(p))
            .collect())
    }

    async fn get_post(&self, id: PostId) -> RepositoryResult<Post> {
        self.tables
            .read()
            .posts
            .get(&id.value())
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| not_found("post", "get_post", id.value()))
    }

    async fn list_posts(&self) -> RepositoryResult<Vec<Post>> {
        Ok(self
            .tables
            .read()
            .posts
            .values()
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn list_posts_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Post>> {
        Ok(self
            .tables
            .read()
            .posts
            .values()
            .filter(|p| p.deleted_at.is_none() && p.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn update_post(&self, id: PostId, changes: PostChanges) -> RepositoryResult<Post> {
        let mut tables = self.tables.write();
        let post = tables
            .live_post_mut(id)
            .ok_or_else(|| not_found("post", "update_post", id.value()))?;

        if changes.is_empty() {
            return Ok(post.clone());
        }

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(body) = changes.body {
            post.body = body;
        }
        if let Some(user_id) = changes.user_id {
            post.user_id = user_id;
        }
        post.updated_at = Utc::now();

        Ok(post.clone())
    }

    async fn soft_delete_post(&self, id: PostId) -> RepositoryResult<()> {
        let mut tables = self.tables.write();
        let post = tables
            .live_post_mut(id)
            .ok_or_else(|| not_found("post", "soft_delete_post", id.value()))?;
        post.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
