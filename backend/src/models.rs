//! Domain model for users and posts.
//!
//! These are the records as the storage layer sees them. The wire-format
//! shapes live in [`crate::http::dto`]; the two are deliberately decoupled so
//! the persisted representation can evolve without breaking clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Post identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl PostId {
    pub fn new(value: i64) -> Self {
        PostId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// A registered author.
///
/// `deleted_at` is the soft-delete marker: a non-`None` value means the row
/// is logically removed and excluded from default queries.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
}

/// A blog post, optionally owned by a user via `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub title: String,
    pub body: String,
    pub user_id: Option<UserId>,
}

/// Values for inserting a user. The storage layer assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
}

/// Values for inserting a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: Option<UserId>,
}

/// Update set for a post. Only fields that are present get written.
///
/// `title`/`body` use a single `Option`: `None` means "leave unchanged".
/// `user_id` is a double `Option` so an explicit `Some(None)` can clear the
/// owner, which a single `Option` could not express.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_id: Option<Option<UserId>>,
}

impl PostChanges {
    /// True when no field would be written. An empty update set is applied
    /// as a no-op and the record is returned unchanged.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.user_id.is_none()
    }
}
