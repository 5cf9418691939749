use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{posts, users};
use crate::models::{NewPost, NewUser, Post, PostChanges, PostId, User, UserId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub title: String,
    pub body: String,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPostRow {
    pub title: String,
    pub body: String,
    pub user_id: Option<i64>,
}

/// Changeset for partial post updates.
///
/// `Option` fields are skipped when `None`; the double-`Option` on `user_id`
/// writes an explicit NULL for `Some(None)`, which is how the owner gets
/// cleared.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub struct PostChangesetRow {
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_id: Option<Option<i64>>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
            name: row.name,
        }
    }
}

impl From<NewUser> for NewUserRow {
    fn from(new_user: NewUser) -> Self {
        NewUserRow {
            name: new_user.name,
        }
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId::new(row.id),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
            title: row.title,
            body: row.body,
            user_id: row.user_id.map(UserId::new),
        }
    }
}

impl From<NewPost> for NewPostRow {
    fn from(new_post: NewPost) -> Self {
        NewPostRow {
            title: new_post.title,
            body: new_post.body,
            user_id: new_post.user_id.map(|id| id.value()),
        }
    }
}

impl PostChangesetRow {
    pub fn from_changes(changes: PostChanges) -> Self {
        PostChangesetRow {
            title: changes.title,
            body: changes.body,
            user_id: changes.user_id.map(|inner| inner.map(|id| id.value())),
            updated_at: Utc::now(),
        }
    }
}
