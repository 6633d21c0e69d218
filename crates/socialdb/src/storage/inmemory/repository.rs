//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use socialdb_core::social::{
    now, Comment, FollowLogEntry, Follower, Like, NewComment, NewFollower, NewLike, NewPost,
    NewUser, Post, User, UserLike, UserUpdate,
};
use socialdb_core::storage::{
    CommentRepository, FollowerRepository, LikeRepository, PostRepository, RepositoryError,
    Result, Table, TableData, TableRepository, UserRepository, DUPLICATE_LIKE_MESSAGE,
};

/// Monotonic id source. Ids are never reused, even after a delete.
#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next_id(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

/// Every table, guarded together so multi-table rules see one snapshot.
#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    likes: BTreeMap<i64, Like>,
    followers: BTreeMap<i64, Follower>,
    follow_log: BTreeMap<i64, FollowLogEntry>,
    user_seq: Sequence,
    post_seq: Sequence,
    comment_seq: Sequence,
    like_seq: Sequence,
    follower_seq: Sequence,
    log_seq: Sequence,
}

impl State {
    fn require_user(&self, user_id: i64, entity_type: &'static str) -> Result<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(RepositoryError::foreign_key(entity_type))
        }
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.user_id) != except)
    }

    /// Whether a constrained row points at the user. The follow log is not
    /// constrained.
    fn user_is_referenced(&self, user_id: i64) -> bool {
        self.posts.values().any(|p| p.user_id == user_id)
            || self.comments.values().any(|c| c.user_id == user_id)
            || self.likes.values().any(|l| l.user_id == user_id)
            || self
                .followers
                .values()
                .any(|f| f.user_id == user_id || f.follower_user_id == user_id)
    }

    fn user_likes(&self) -> Vec<UserLike> {
        self.likes
            .values()
            .filter_map(|like| {
                self.users
                    .get(&like.user_id)
                    .map(|user| UserLike::join(user, like))
            })
            .collect()
    }
}

/// In-memory storage backend.
///
/// Data is not persisted and will be lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&user_id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<i64> {
        let mut state = self.state.write().await;
        if state.email_taken(&user.email, None) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }

        let user_id = state.user_seq.next_id();
        state.users.insert(
            user_id,
            User {
                user_id,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                password: user.password.clone(),
                role: user.role,
            },
        );
        Ok(user_id)
    }

    async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(RepositoryError::not_found("User", user_id));
        }
        if state.email_taken(&update.email, Some(user_id)) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: update.email.clone(),
            });
        }

        if let Some(user) = state.users.get_mut(&user_id) {
            user.first_name = update.first_name.clone();
            user.last_name = update.last_name.clone();
            user.email = update.email.clone();
            user.password = update.password.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository {
    async fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        let state = self.state.read().await;
        Ok(state.posts.get(&post_id).cloned())
    }

    async fn create_post(&self, post: &NewPost) -> Result<i64> {
        let mut state = self.state.write().await;
        state.require_user(post.user_id, "Post")?;

        let post_id = state.post_seq.next_id();
        state.posts.insert(
            post_id,
            Post {
                post_id,
                user_id: post.user_id,
                post_content: post.post_content.clone(),
                created_date: post.created_date,
                updated_date: None,
            },
        );
        Ok(post_id)
    }

    async fn update_post(&self, post_id: i64, content: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let post = state
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| RepositoryError::not_found("Post", post_id))?;

        post.post_content = content.to_string();
        post.updated_date = Some(now());
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryRepository {
    async fn create_comment(&self, comment: &NewComment) -> Result<i64> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(RepositoryError::foreign_key("Comment"));
        }
        state.require_user(comment.user_id, "Comment")?;

        let comment_id = state.comment_seq.next_id();
        state.comments.insert(
            comment_id,
            Comment {
                comment_id,
                post_id: comment.post_id,
                user_id: comment.user_id,
                comment_content: comment.comment_content.clone(),
                comment_date: comment.comment_date,
            },
        );
        Ok(comment_id)
    }

    async fn update_comment(&self, comment_id: i64, content: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let comment = state
            .comments
            .get_mut(&comment_id)
            .ok_or_else(|| RepositoryError::not_found("Comment", comment_id))?;

        comment.comment_content = content.to_string();
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryRepository {
    async fn create_like(&self, like: &NewLike) -> Result<i64> {
        let mut state = self.state.write().await;
        // The duplicate rule runs before reference checks, as a BEFORE INSERT trigger would.
        if state
            .likes
            .values()
            .any(|l| l.post_id == like.post_id && l.user_id == like.user_id)
        {
            return Err(RepositoryError::Rejected(DUPLICATE_LIKE_MESSAGE.to_string()));
        }
        state.require_user(like.user_id, "Likes")?;

        let like_id = state.like_seq.next_id();
        state.likes.insert(
            like_id,
            Like {
                like_id,
                post_id: like.post_id,
                user_id: like.user_id,
                like_date: like.like_date,
            },
        );
        Ok(like_id)
    }
}

#[async_trait]
impl FollowerRepository for InMemoryRepository {
    async fn create_follower(&self, follower: &NewFollower) -> Result<i64> {
        let mut state = self.state.write().await;
        state.require_user(follower.user_id, "Follower")?;
        state.require_user(follower.follower_user_id, "Follower")?;

        let follower_id = state.follower_seq.next_id();
        state.followers.insert(
            follower_id,
            Follower {
                follower_id,
                user_id: follower.user_id,
                follower_user_id: follower.follower_user_id,
                follow_date: follower.follow_date,
            },
        );

        let log_id = state.log_seq.next_id();
        state.follow_log.insert(
            log_id,
            FollowLogEntry {
                log_id,
                user_id: follower.user_id,
                follower_user_id: follower.follower_user_id,
                follow_date: follower.follow_date,
            },
        );
        Ok(follower_id)
    }
}

#[async_trait]
impl TableRepository for InMemoryRepository {
    async fn delete_record(&self, table: Table, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let removed = match table {
            Table::User => {
                if state.users.contains_key(&id) && state.user_is_referenced(id) {
                    return Err(RepositoryError::foreign_key("User"));
                }
                state.users.remove(&id).is_some()
            }
            Table::Post => {
                let removed = state.posts.remove(&id).is_some();
                if removed {
                    state.comments.retain(|_, c| c.post_id != id);
                }
                removed
            }
            Table::Comment => state.comments.remove(&id).is_some(),
            Table::Likes => state.likes.remove(&id).is_some(),
            Table::Follower => state.followers.remove(&id).is_some(),
            Table::FollowLog | Table::UserLikes => {
                return Err(RepositoryError::InvalidData(format!(
                    "{table} does not support delete by id"
                )));
            }
        };

        if removed {
            Ok(())
        } else {
            Err(RepositoryError::not_found(table.name(), id))
        }
    }

    async fn list_table(&self, table: Table) -> Result<TableData> {
        let state = self.state.read().await;
        let data = match table {
            Table::User => TableData::from_rows(state.users.values()),
            Table::Post => TableData::from_rows(state.posts.values()),
            Table::Comment => TableData::from_rows(state.comments.values()),
            Table::Likes => TableData::from_rows(state.likes.values()),
            Table::Follower => TableData::from_rows(state.followers.values()),
            Table::FollowLog => TableData::from_rows(state.follow_log.values()),
            Table::UserLikes => TableData::from_rows(&state.user_likes()),
        };
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use socialdb_core::social::Role;
    use socialdb_core::storage::Cell;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn new_user(email: &str) -> NewUser {
        NewUser::new("Test", "User", email, "secret", Role::User)
    }

    async fn repo_with_post() -> (InMemoryRepository, i64, i64) {
        let repo = InMemoryRepository::new();
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

    // ==================== User Tests ====================

    #[tokio::test]
    async fn test_user_create_and_get() {
        let repo = InMemoryRepository::new();

        let id = repo.create_user(&new_user("a@example.com")).await.unwrap();

        let user = repo.get_user(id).await.unwrap().unwrap();
        assert_eq!(user.user_id, 1);
        assert_eq!(user.first_name, "Test");
        assert_eq!(user.last_name, "User");
    }

    #[tokio::test]
    async fn test_user_duplicate_email() {
        let repo = InMemoryRepository::new();
        repo.create_user(&new_user("a@example.com")).await.unwrap();

        let result = repo.create_user(&new_user("a@example.com")).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_user_update_keeps_own_email() {
        let repo = InMemoryRepository::new();
        let id = repo.create_user(&new_user("a@example.com")).await.unwrap();
        let update = UserUpdate {
            first_name: "New".to_string(),
            last_name: "Name".to_string(),
            email: "a@example.com".to_string(),
            password: "changed".to_string(),
        };

        repo.update_user(id, &update).await.unwrap();

        let user = repo.get_user(id).await.unwrap().unwrap();
        assert_eq!(user.first_name, "New");
        assert_eq!(user.password, "changed");
    }

    #[tokio::test]
    async fn test_user_update_to_taken_email() {
        let repo = InMemoryRepository::new();
        repo.create_user(&new_user("a@example.com")).await.unwrap();
        let id = repo.create_user(&new_user("b@example.com")).await.unwrap();
        let update = UserUpdate {
            first_name: "B".to_string(),
            last_name: "B".to_string(),
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
        };

        let result = repo.update_user(id, &update).await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    // ==================== Post Tests ====================

    #[tokio::test]
    async fn test_post_requires_user() {
        let repo = InMemoryRepository::new();

        let result = repo
            .create_post(&NewPost {
                user_id: 7,
                post_content: "orphan".to_string(),
                created_date: at(1),
            })
            .await;

        assert_eq!(result, Err(RepositoryError::foreign_key("Post")));
    }

    #[tokio::test]
    async fn test_post_update_sets_updated_date() {
        let (repo, _, post_id) = repo_with_post().await;

        repo.update_post(post_id, "edited").await.unwrap();

        let post = repo.get_post(post_id).await.unwrap().unwrap();
        assert_eq!(post.post_content, "edited");
        assert!(post.updated_date.unwrap() > post.created_date);
    }

    #[tokio::test]
    async fn test_post_update_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo.update_post(1, "x").await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Comment / Like Tests ====================

    #[tokio::test]
    async fn test_comment_requires_post() {
        let (repo, user_id, _) = repo_with_post().await;

        let result = repo
            .create_comment(&NewComment {
                post_id: 99,
                user_id,
                comment_content: "hi".to_string(),
                comment_date: at(2),
            })
            .await;

        assert_eq!(result, Err(RepositoryError::foreign_key("Comment")));
    }

    #[tokio::test]
    async fn test_comment_update() {
        let (repo, user_id, post_id) = repo_with_post().await;
        let id = repo
            .create_comment(&NewComment {
                post_id,
                user_id,
                comment_content: "hi".to_string(),
                comment_date: at(2),
            })
            .await
            .unwrap();

        repo.update_comment(id, "edited").await.unwrap();

        let comments = repo.list_table(Table::Comment).await.unwrap();
        assert_eq!(
            comments.column("comment_content").unwrap(),
            vec![&Cell::Text("edited".to_string())]
        );
        assert_eq!(
            comments.column("comment_date").unwrap(),
            vec![&Cell::Text("2024-01-02 09:00:00".to_string())]
        );
    }

    #[tokio::test]
    async fn test_duplicate_like_rejected() {
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
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let (repo, user_id, post_id) = repo_with_post().await;
        let like = NewLike {
            post_id,
            user_id,
            like_date: at(2),
        };

        let first = repo.create_like(&like).await.unwrap();
        repo.delete_record(Table::Likes, first).await.unwrap();
        let second = repo.create_like(&like).await.unwrap();

        assert!(second > first);
    }

    // ==================== Follower Tests ====================

    #[tokio::test]
    async fn test_follow_writes_log() {
        let repo = InMemoryRepository::new();
        let a = repo.create_user(&new_user("a@example.com")).await.unwrap();
        let b = repo.create_user(&new_user("b@example.com")).await.unwrap();

        repo.create_follower(&NewFollower {
            user_id: a,
            follower_user_id: b,
            follow_date: at(4),
        })
        .await
        .unwrap();

        let log = repo.list_table(Table::FollowLog).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.column("follower_user_id").unwrap(), vec![&Cell::Integer(b)]);
        assert_eq!(
            log.column("follow_date").unwrap(),
            vec![&Cell::Text("2024-01-04 09:00:00".to_string())]
        );
    }

    #[tokio::test]
    async fn test_follow_requires_both_users() {
        let repo = InMemoryRepository::new();
        let a = repo.create_user(&new_user("a@example.com")).await.unwrap();

        let result = repo
            .create_follower(&NewFollower {
                user_id: a,
                follower_user_id: 42,
                follow_date: at(4),
            })
            .await;

        assert!(result.is_err());
        assert!(repo.list_table(Table::FollowLog).await.unwrap().is_empty());
    }

    // ==================== Table Tests ====================

    #[tokio::test]
    async fn test_delete_post_cascades_comments_only() {
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

        assert!(repo.list_table(Table::Comment).await.unwrap().is_empty());
        let likes = repo.list_table(Table::Likes).await.unwrap();
        assert_eq!(likes.column("post_id").unwrap(), vec![&Cell::Integer(post_id)]);
    }

    #[tokio::test]
    async fn test_follow_log_does_not_pin_users() {
        let repo = InMemoryRepository::new();
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
    }

    #[tokio::test]
    async fn test_delete_unreferenced_user() {
        let repo = InMemoryRepository::new();
        let id = repo.create_user(&new_user("a@example.com")).await.unwrap();

        repo.delete_record(Table::User, id).await.unwrap();

        assert!(repo.get_user(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo.delete_record(Table::Comment, 3).await;
        assert_eq!(result, Err(RepositoryError::not_found("Comment", 3)));
    }

    #[tokio::test]
    async fn test_list_user_likes_view() {
        let (repo, user_id, post_id) = repo_with_post().await;
        repo.create_like(&NewLike {
            post_id,
            user_id,
            like_date: at(3),
        })
        .await
        .unwrap();

        let data = repo.list_table(Table::UserLikes).await.unwrap();

        assert_eq!(data.columns, Table::UserLikes.columns());
        assert_eq!(
            data.column("email"),
            Some(vec![&Cell::Text("a@example.com".to_string())])
        );
    }

    #[tokio::test]
    async fn test_list_empty_table() {
        let repo = InMemoryRepository::new();
        let data = repo.list_table(Table::Follower).await.unwrap();
        assert!(data.is_empty());
        assert_eq!(data.columns, Table::Follower.columns());
    }
}
