use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Account role. Stored as its display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Role::User),
            "Admin" => Ok(Role::Admin),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// A post authored by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: i64,
    pub user_id: i64,
    pub post_content: String,
    #[serde(with = "crate::serde::timestamp")]
    pub created_date: NaiveDateTime,
    /// Rewritten by the store whenever the row changes. `None` until the first update.
    #[serde(default, with = "crate::serde::optional_timestamp")]
    pub updated_date: Option<NaiveDateTime>,
}

/// A comment on a post. Removed together with its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub comment_content: String,
    #[serde(with = "crate::serde::timestamp")]
    pub comment_date: NaiveDateTime,
}

/// A like of a post. At most one per (post, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub like_id: i64,
    pub post_id: i64,
    pub user_id: i64,
    #[serde(with = "crate::serde::timestamp")]
    pub like_date: NaiveDateTime,
}

/// `follower_user_id` follows `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    pub follower_id: i64,
    pub user_id: i64,
    pub follower_user_id: i64,
    #[serde(with = "crate::serde::timestamp")]
    pub follow_date: NaiveDateTime,
}

/// Append-only record written for every follower insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowLogEntry {
    pub log_id: i64,
    pub user_id: i64,
    pub follower_user_id: i64,
    #[serde(with = "crate::serde::timestamp")]
    pub follow_date: NaiveDateTime,
}

/// One row of the user/likes join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLike {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub like_id: i64,
    pub post_id: i64,
    #[serde(with = "crate::serde::timestamp")]
    pub like_date: NaiveDateTime,
}

impl UserLike {
    /// Joins a user with one of their likes.
    pub fn join(user: &User, like: &Like) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            like_id: like.like_id,
            post_id: like.post_id,
            like_date: like.like_date,
        }
    }
}
