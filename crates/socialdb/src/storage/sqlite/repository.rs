//! SQLite repository implementation.
//!
//! Implements the repository traits from `socialdb_core::storage` using SQLite.
//! Integrity rules are enforced by the schema itself (see `schema.rs`).

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use socialdb_core::serde::format_timestamp;
use socialdb_core::social::{
    NewComment, NewFollower, NewLike, NewPost, NewUser, Post, User, UserUpdate,
};
use socialdb_core::storage::{
    CommentRepository, FollowerRepository, LikeRepository, PostRepository, RepositoryError,
    Result, Table, TableData, TableRepository, UserRepository,
};

use super::conversions::{row_to_cells, row_to_post, row_to_user};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Fails with `QueryReturnedNoRows` when a write touched nothing.
fn expect_changed(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// SQLite-based repository implementation.
///
/// Owns one connection; `tokio_rusqlite` runs every call on the connection's
/// own thread, so calls are serialised.
#[derive(Clone)]
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::debug!(path, "opened sqlite store");

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize connection settings and the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::PRAGMAS).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Closes the connection, surfacing any error from the close itself.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Connection"))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([user_id], row_to_user) {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id))
    }

    async fn create_user(&self, user: &NewUser) -> Result<i64> {
        let first_name = user.first_name.clone();
        let last_name = user.last_name.clone();
        let email = user.email.clone();
        let password = user.password.clone();
        let role = user.role.as_str();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![first_name, last_name, email, password, role],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", &user.email))
    }

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<()> {
        let first_name = update.first_name.clone();
        let last_name = update.last_name.clone();
        let email = update.email.clone();
        let password = update.password.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER,
                        rusqlite::params![user_id, first_name, last_name, email, password],
                    )
                    .map_err(wrap_err)?;
                expect_changed(rows)
            })
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => {
                    RepositoryError::not_found("User", user_id)
                }
                e => map_tokio_rusqlite_error_with_id(e, "User", &update.email),
            })
    }
}

// ============================================================================
// PostRepository implementation
// ============================================================================

#[async_trait]
impl PostRepository for SqliteRepository {
    async fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_POST_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([post_id], row_to_post) {
                    Ok(post) => Ok(Some(post)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Post", post_id))
    }

    async fn create_post(&self, post: &NewPost) -> Result<i64> {
        let user_id = post.user_id;
        let content = post.post_content.clone();
        let created_date = format_timestamp(&post.created_date);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_POST,
                    rusqlite::params![user_id, content, created_date],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Post"))
    }

    async fn update_post(&self, post_id: i64, content: &str) -> Result<()> {
        let content = content.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_POST, rusqlite::params![post_id, content])
                    .map_err(wrap_err)?;
                expect_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Post", post_id))
    }
}

// ============================================================================
// CommentRepository implementation
// ============================================================================

#[async_trait]
impl CommentRepository for SqliteRepository {
    async fn create_comment(&self, comment: &NewComment) -> Result<i64> {
        let post_id = comment.post_id;
        let user_id = comment.user_id;
        let content = comment.comment_content.clone();
        let comment_date = format_timestamp(&comment.comment_date);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COMMENT,
                    rusqlite::params![post_id, user_id, content, comment_date],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment"))
    }

    async fn update_comment(&self, comment_id: i64, content: &str) -> Result<()> {
        let content = content.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_COMMENT, rusqlite::params![comment_id, content])
                    .map_err(wrap_err)?;
                expect_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Comment", comment_id))
    }
}

// ============================================================================
// LikeRepository implementation
// ============================================================================

#[async_trait]
impl LikeRepository for SqliteRepository {
    async fn create_like(&self, like: &NewLike) -> Result<i64> {
        let post_id = like.post_id;
        let user_id = like.user_id;
        let like_date = format_timestamp(&like.like_date);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_LIKE,
                    rusqlite::params![post_id, user_id, like_date],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Likes"))
    }
}

// ============================================================================
// FollowerRepository implementation
// ============================================================================

#[async_trait]
impl FollowerRepository for SqliteRepository {
    async fn create_follower(&self, follower: &NewFollower) -> Result<i64> {
        let user_id = follower.user_id;
        let follower_user_id = follower.follower_user_id;
        let follow_date = format_timestamp(&follower.follow_date);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_FOLLOWER,
                    rusqlite::params![user_id, follower_user_id, follow_date],
                )
                .map_err(wrap_err)?;
                // The follow-log trigger has finished, so this is the Follower row.
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Follower"))
    }
}

// ============================================================================
// TableRepository implementation
// ============================================================================

#[async_trait]
impl TableRepository for SqliteRepository {
    async fn delete_record(&self, table: Table, id: i64) -> Result<()> {
        let sql = schema::delete_by_id(table).ok_or_else(|| {
            RepositoryError::InvalidData(format!("{table} does not support delete by id"))
        })?;

        self.conn
            .call(move |conn| {
                let rows = conn.execute(&sql, [id]).map_err(wrap_err)?;
                expect_changed(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, table.name(), id))
    }

    async fn list_table(&self, table: Table) -> Result<TableData> {
        let sql = schema::select_all(table);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let columns: Vec<String> = stmt
                    .column_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                let column_count = columns.len();
                let rows = stmt
                    .query_map([], |row| row_to_cells(row, column_count))
                    .map_err(wrap_err)?;

                let mut cells = Vec::new();
                for row_result in rows {
                    cells.push(row_result.map_err(wrap_err)?);
                }
                Ok(TableData {
                    table,
                    columns,
                    rows: cells,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, table.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use socialdb_core::social::Role;
    use socialdb_core::storage::{Cell, DUPLICATE_LIKE_MESSAGE};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn new_user(email: &str) -> NewUser {
        NewUser::new("Test", "User", email, "secret", Role::User)
    }

    async fn repo_with_post() -> (SqliteRepository, i64, i64) {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user_id = repo.create_user(&new_user("a@example.com")).await.unwrap();
        let post_id = repo
            .create_post(&NewPost {
                user_id,
                post_content: "first".to_string(),
                created_date: at(1),
            })
            .await
            .unwrap();
        (repo, user_id, post_id)
    }

    #[tokio::test]
    async fn test_schema_init_is_idempotent() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        SqliteRepository::init_schema(&repo.conn).await.unwrap();
    }

    #[tokio::test]
    async fn test_user_create_and_get() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let id = repo.create_user(&new_user("a@example.com")).await.unwrap();
        let user = repo.get_user(id).await.unwrap().unwrap();

        assert_eq!(user.user_id, id);
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_user_get_nonexistent() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        assert!(repo.get_user(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_already_exists() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.create_user(&new_user("a@example.com")).await.unwrap();

        let result = repo.create_user(&new_user("a@example.com")).await;

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: "a@example.com".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_update_user_nonexistent() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let update = UserUpdate {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "ab@example.com".to_string(),
            password: "pw".to_string(),
        };

        let result = repo.update_user(5, &update).await;

        assert_eq!(result, Err(RepositoryError::not_found("User", 5)));
    }

    #[tokio::test]
    async fn test_post_insert_checks_foreign_key() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let result = repo
            .create_post(&NewPost {
                user_id: 42,
                post_content: "orphan".to_string(),
                created_date: at(1),
            })
            .await;

        assert_eq!(result, Err(RepositoryError::foreign_key("Post")));
    }

    #[tokio::test]
    async fn test_update_post_trigger_sets_updated_date() {
        let (repo, _, post_id) = repo_with_post().await;
        assert_eq!(repo.get_post(post_id).await.unwrap().unwrap().updated_date, None);

        repo.update_post(post_id, "edited").await.unwrap();

        let post = repo.get_post(post_id).await.unwrap().unwrap();
        assert_eq!(post.post_content, "edited");
        assert!(post.updated_date.unwrap() > post.created_date);
    }

    #[tokio::test]
    async fn test_update_post_nonexistent() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let result = repo.update_post(3, "nothing").await;
        assert_eq!(result, Err(RepositoryError::not_found("Post", 3)));
    }

    #[tokio::test]
    async fn test_comment_ids_are_generated() {
        let (repo, user_id, post_id) = repo_with_post().await;
        let comment = NewComment {
            post_id,
            user_id,
            comment_content: "nice".to_string(),
            comment_date: at(2),
        };

        let first = repo.create_comment(&comment).await.unwrap();
        let second = repo.create_comment(&comment).await.unwrap();

        assert_ne!(first, second);
        let comments = repo.list_table(Table::Comment).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(
            comments.rows[0],
            vec![
                Cell::Integer(first),
                Cell::Integer(post_id),
                Cell::Integer(user_id),
                Cell::Text("nice".to_string()),
                Cell::Text("2024-01-02 09:00:00".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_like_trigger() {
        let (repo, user_id, post_id) = repo_with_post().await;
        let like = NewLike {
            post_id,
            user_id,
            like_date: at(2),
        };

        repo.create_like(&like).await.unwrap();
        let result = repo.create_like(&like).await;

        assert_eq!(
            result,
            Err(RepositoryError::Rejected(DUPLICATE_LIKE_MESSAGE.to_string()))
        );
        assert_eq!(repo.list_table(Table::Likes).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_trigger_writes_log_and_returns_follower_id() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let a = repo.create_user(&new_user("a@example.com")).await.unwrap();
        let b = repo.create_user(&new_user("b@example.com")).await.unwrap();
        repo.create_follower(&NewFollower {
            user_id: b,
            follower_user_id: a,
            follow_date: at(1),
        })
        .await
        .unwrap();

        let id = repo
            .create_follower(&NewFollower {
                user_id: a,
                follower_user_id: b,
                follow_date: at(3),
            })
            .await
            .unwrap();

        let followers = repo.list_table(Table::Follower).await.unwrap();
        assert_eq!(followers.len(), 2);
        assert_eq!(followers.column("follower_id").unwrap()[1], &Cell::Integer(id));
        assert_eq!(repo.list_table(Table::FollowLog).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_post_cascades_comments_but_not_likes() {
        let (repo, user_id, post_id) = repo_with_post().await;
        repo.create_comment(&NewComment {
            post_id,
            user_id,
            comment_content: "c".to_string(),
            comment_date: at(2),
        })
        .await
        .unwrap();
        repo.create_like(&NewLike {
            post_id,
            user_id,
            like_date: at(2),
        })
        .await
        .unwrap();

        repo.delete_record(Table::Post, post_id).await.unwrap();

        assert!(repo.get_post(post_id).await.unwrap().is_none());
        assert!(repo.list_table(Table::Comment).await.unwrap().is_empty());
        let likes = repo.list_table(Table::Likes).await.unwrap();
        assert_eq!(likes.column("post_id").unwrap(), vec![&Cell::Integer(post_id)]);
    }

    #[tokio::test]
    async fn test_follow_log_does_not_pin_users() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let a = repo.create_user(&new_user("a@example.com")).await.unwrap();
        let b = repo.create_user(&new_user("b@example.com")).await.unwrap();
        let follow = repo
            .create_follower(&NewFollower {
                user_id: a,
                follower_user_id: b,
                follow_date: at(1),
            })
            .await
            .unwrap();

        repo.delete_record(Table::Follower, follow).await.unwrap();
        repo.delete_record(Table::User, a).await.unwrap();
        repo.delete_record(Table::User, b).await.unwrap();

        let log = repo.list_table(Table::FollowLog).await.unwrap();
        assert_eq!(log.column("user_id").unwrap(), vec![&Cell::Integer(a)]);
    }

    #[tokio::test]
    async fn test_delete_referenced_user_fails() {
        let (repo, user_id, _) = repo_with_post().await;

        let result = repo.delete_record(Table::User, user_id).await;

        assert_eq!(result, Err(RepositoryError::foreign_key("User")));
        assert!(repo.get_user(user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_record() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let result = repo.delete_record(Table::Likes, 8).await;
        assert_eq!(result, Err(RepositoryError::not_found("Likes", 8)));
    }

    #[tokio::test]
    async fn test_delete_from_follow_log_is_refused() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let result = repo.delete_record(Table::FollowLog, 1).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_list_table_columns_match_declaration() {
        let (repo, _, _) = repo_with_post().await;

        for table in Table::ALL
            .into_iter()
            .chain(std::iter::once(Table::UserLikes))
        {
            let data = repo.list_table(table).await.unwrap();
            assert_eq!(data.columns, table.columns(), "columns of {table}");
        }
    }

    #[tokio::test]
    async fn test_list_table_rows() {
        let (repo, user_id, post_id) = repo_with_post().await;

        let data = repo.list_table(Table::Post).await.unwrap();

        assert_eq!(
            data.rows,
            vec![vec![
                Cell::Integer(post_id),
                Cell::Integer(user_id),
                Cell::Text("first".to_string()),
                Cell::Text("2024-01-01 09:00:00".to_string()),
                Cell::Null,
            ]]
        );
    }

    #[tokio::test]
    async fn test_user_likes_view() {
        let (repo, user_id, post_id) = repo_with_post().await;
        repo.create_like(&NewLike {
            post_id,
            user_id,
            like_date: at(5),
        })
        .await
        .unwrap();

        let view = repo.list_table(Table::UserLikes).await.unwrap();

        assert_eq!(view.len(), 1);
        assert_eq!(
            view.column("email").unwrap(),
            vec![&Cell::Text("a@example.com".to_string())]
        );
        assert_eq!(view.column("post_id").unwrap(), vec![&Cell::Integer(post_id)]);
        assert_eq!(
            view.column("like_date").unwrap(),
            vec![&Cell::Text("2024-01-05 09:00:00".to_string())]
        );
    }

    #[tokio::test]
    async fn test_data_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("social.db");
        let path = path.to_str().unwrap();

        let repo = SqliteRepository::new(path).await.unwrap();
        let id = repo.create_user(&new_user("keep@example.com")).await.unwrap();
        repo.close().await.unwrap();

        let reopened = SqliteRepository::new(path).await.unwrap();
        let user = reopened.get_user(id).await.unwrap().unwrap();
        assert_eq!(user.email, "keep@example.com");
    }
}
