use async_trait::async_trait;

use crate::social::{NewComment, NewFollower, NewLike, NewPost, NewUser, Post, User, UserUpdate};

use super::{Result, Table, TableData};

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by id.
    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Inserts a user and returns the assigned id. Fails on a duplicate email.
    async fn create_user(&self, user: &NewUser) -> Result<i64>;

    /// Replaces names, email and password of an existing user.
    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<()>;
}

/// Repository for post operations.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Gets a post by id.
    async fn get_post(&self, post_id: i64) -> Result<Option<Post>>;

    /// Inserts a post and returns the assigned id.
    async fn create_post(&self, post: &NewPost) -> Result<i64>;

    /// Replaces the content of a post. The store refreshes `updated_date`.
    async fn update_post(&self, post_id: i64, content: &str) -> Result<()>;
}

/// Repository for comment operations.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, comment: &NewComment) -> Result<i64>;

    async fn update_comment(&self, comment_id: i64, content: &str) -> Result<()>;
}

/// Repository for like operations.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Inserts a like. Rejected when the user already liked the post.
    async fn create_like(&self, like: &NewLike) -> Result<i64>;
}

/// Repository for follower operations.
#[async_trait]
pub trait FollowerRepository: Send + Sync {
    /// Inserts a follower row and its follow-log mirror.
    async fn create_follower(&self, follower: &NewFollower) -> Result<i64>;
}

/// Untyped access by table name.
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Deletes one row by its key. Fails for tables without a key column.
    async fn delete_record(&self, table: Table, id: i64) -> Result<()>;

    /// Lists every row of a table or view.
    async fn list_table(&self, table: Table) -> Result<TableData>;
}

/// Everything the access layer needs from a store.
pub trait SocialRepository:
    UserRepository
    + PostRepository
    + CommentRepository
    + LikeRepository
    + FollowerRepository
    + TableRepository
{
}

impl<T> SocialRepository for T where
    T: UserRepository
        + PostRepository
        + CommentRepository
        + LikeRepository
        + FollowerRepository
        + TableRepository
{
}
