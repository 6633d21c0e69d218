//! Insert and update payloads.
//!
//! Row ids are assigned by the store, so these carry every column except the key.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::types::Role;

/// Payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl NewUser {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

/// Replacement values for an existing user. The role is not editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub user_id: i64,
    pub post_content: String,
    #[serde(with = "crate::serde::timestamp")]
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: i64,
    pub user_id: i64,
    pub comment_content: String,
    #[serde(with = "crate::serde::timestamp")]
    pub comment_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLike {
    pub post_id: i64,
    pub user_id: i64,
    #[serde(with = "crate::serde::timestamp")]
    pub like_date: NaiveDateTime,
}

/// `follower_user_id` starts following `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFollower {
    pub user_id: i64,
    pub follower_user_id: i64,
    #[serde(with = "crate::serde::timestamp")]
    pub follow_date: NaiveDateTime,
}
