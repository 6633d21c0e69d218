//! Access layer over a [`SocialRepository`].
//!
//! Every write checks the rows it references, performs one repository call and
//! reports an [`Outcome`]. Store failures never escape as errors; they become
//! failure outcomes carrying the error's message.

use chrono::NaiveDateTime;
use thiserror::Error;

use socialdb_core::social::{
    validate_content, validate_new_user, validate_user_update, NewComment, NewFollower, NewLike,
    NewPost, NewUser, Outcome, UserUpdate,
};
use socialdb_core::storage::{
    RepositoryError, Result, SocialRepository, Table, TableData, TableError,
};

/// Message for a delete aimed at anything but the five editable tables.
pub const INVALID_TABLE_MESSAGE: &str = "Invalid table name.";

/// Errors from listing a table by name.
#[derive(Debug, Error, PartialEq)]
pub enum ListError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The social data manager: validated writes and listings over one store handle.
#[derive(Debug, Clone)]
pub struct SocialService<R> {
    repo: R,
}

impl<R: SocialRepository> SocialService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user account.
    pub async fn register(&self, user: NewUser) -> Outcome {
        if let Err(e) = validate_new_user(&user) {
            return rejected("register", e);
        }

        let result = self.repo.create_user(&user).await;
        finish_create("register", result, "User registered successfully!")
    }

    /// Adds a post on behalf of an existing user.
    pub async fn add_post(
        &self,
        user_id: i64,
        content: &str,
        created_date: NaiveDateTime,
    ) -> Outcome {
        if let Err(e) = validate_content("Post content", content) {
            return rejected("add_post", e);
        }
        if let Some(outcome) = self.require_user(user_id, "User does not exist.").await {
            return outcome;
        }

        let post = NewPost {
            user_id,
            post_content: content.to_string(),
            created_date,
        };
        let result = self.repo.create_post(&post).await;
        finish_create("add_post", result, "Post added successfully.")
    }

    /// Adds a comment to an existing post.
    pub async fn add_comment(
        &self,
        post_id: i64,
        user_id: i64,
        content: &str,
        comment_date: NaiveDateTime,
    ) -> Outcome {
        if let Err(e) = validate_content("Comment content", content) {
            return rejected("add_comment", e);
        }
        if let Some(outcome) = self.require_post(post_id).await {
            return outcome;
        }
        if let Some(outcome) = self.require_user(user_id, "User does not exist.").await {
            return outcome;
        }

        let comment = NewComment {
            post_id,
            user_id,
            comment_content: content.to_string(),
            comment_date,
        };
        let result = self.repo.create_comment(&comment).await;
        finish_create("add_comment", result, "Comment added successfully.")
    }

    /// Likes a post. A user can like a given post once.
    pub async fn add_like(&self, post_id: i64, user_id: i64, like_date: NaiveDateTime) -> Outcome {
        if let Some(outcome) = self.require_post(post_id).await {
            return outcome;
        }
        if let Some(outcome) = self.require_user(user_id, "User does not exist.").await {
            return outcome;
        }

        let like = NewLike {
            post_id,
            user_id,
            like_date,
        };
        let result = self.repo.create_like(&like).await;
        finish_create("add_like", result, "Post liked successfully.")
    }

    /// Records that `follower_user_id` follows `user_id`.
    pub async fn follow(
        &self,
        user_id: i64,
        follower_user_id: i64,
        follow_date: NaiveDateTime,
    ) -> Outcome {
        if let Some(outcome) = self.require_user(user_id, "User does not exist.").await {
            return outcome;
        }
        if let Some(outcome) = self
            .require_user(follower_user_id, "Follower does not exist.")
            .await
        {
            return outcome;
        }

        let follower = NewFollower {
            user_id,
            follower_user_id,
            follow_date,
        };
        let result = self.repo.create_follower(&follower).await;
        finish_create("follow", result, "User followed successfully.")
    }

    /// Replaces the content and refreshes `updated_date`.
    ///
    /// Timestamps have one-second resolution, so an update within the second
    /// the post was created leaves `updated_date` equal to `created_date`.
    pub async fn update_post(&self, post_id: i64, content: &str) -> Outcome {
        if let Err(e) = validate_content("Post content", content) {
            return rejected("update_post", e);
        }

        let result = self.repo.update_post(post_id, content).await;
        finish("update_post", result, "Post updated successfully.")
    }

    pub async fn update_comment(&self, comment_id: i64, content: &str) -> Outcome {
        if let Err(e) = validate_content("Comment content", content) {
            return rejected("update_comment", e);
        }

        let result = self.repo.update_comment(comment_id, content).await;
        finish("update_comment", result, "Comment updated successfully.")
    }

    /// Replaces the names, email and password of a user. The role is kept.
    pub async fn update_user(&self, user_id: i64, update: UserUpdate) -> Outcome {
        if let Err(e) = validate_user_update(&update) {
            return rejected("update_user", e);
        }

        let result = self.repo.update_user(user_id, &update).await;
        finish("update_user", result, "User updated successfully.")
    }

    /// Deletes one row by key from User, Post, Comment, Likes or Follower.
    pub async fn delete_record(&self, table: &str, id: i64) -> Outcome {
        let table = match table.parse::<Table>() {
            Ok(table) if table.id_column().is_some() => table,
            _ => {
                tracing::warn!(table, id, "delete refused for table");
                return Outcome::failed(INVALID_TABLE_MESSAGE);
            }
        };

        let result = self.repo.delete_record(table, id).await;
        finish(
            "delete_record",
            result,
            format!("Record with ID {id} deleted from {table}."),
        )
    }

    /// Lists a table or the `UserLikes` view by name.
    pub async fn list_table(&self, table: &str) -> std::result::Result<TableData, ListError> {
        let table: Table = table.parse()?;
        let data = self.repo.list_table(table).await?;
        tracing::debug!(%table, rows = data.len(), "listed table");
        Ok(data)
    }

    /// Lists every base table in declaration order.
    pub async fn list_all(&self) -> Result<Vec<TableData>> {
        let mut tables = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            tables.push(self.repo.list_table(table).await?);
        }
        Ok(tables)
    }

    /// `Some(failure)` when the user is missing or the lookup failed.
    async fn require_user(&self, user_id: i64, missing: &str) -> Option<Outcome> {
        match self.repo.get_user(user_id).await {
            Ok(Some(_)) => None,
            Ok(None) => {
                tracing::warn!(user_id, "{missing}");
                Some(Outcome::failed(missing))
            }
            Err(e) => {
                tracing::error!(error = %e, user_id, "Failed to look up user");
                Some(e.into())
            }
        }
    }

    async fn require_post(&self, post_id: i64) -> Option<Outcome> {
        match self.repo.get_post(post_id).await {
            Ok(Some(_)) => None,
            Ok(None) => {
                tracing::warn!(post_id, "Post does not exist.");
                Some(Outcome::failed("Post does not exist."))
            }
            Err(e) => {
                tracing::error!(error = %e, post_id, "Failed to look up post");
                Some(e.into())
            }
        }
    }
}

fn rejected(operation: &str, err: impl std::error::Error) -> Outcome {
    tracing::warn!(operation, error = %err, "invalid input");
    err.into()
}

fn finish_create(operation: &str, result: Result<i64>, message: &str) -> Outcome {
    match result {
        Ok(id) => {
            tracing::info!(operation, id, "{message}");
            Outcome::created(message, id)
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "write failed");
            e.into()
        }
    }
}

fn finish(operation: &str, result: Result<()>, message: impl Into<String>) -> Outcome {
    match result {
        Ok(()) => {
            let message = message.into();
            tracing::info!(operation, "{message}");
            Outcome::ok(message)
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "write failed");
            e.into()
        }
    }
}
