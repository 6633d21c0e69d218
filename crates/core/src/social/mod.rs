mod error;
mod operations;
mod outcome;
mod requests;
mod types;

pub use error::ValidationError;
pub use operations::{
    now, validate_content, validate_new_user, validate_user_update, MAX_CONTENT_LEN, MAX_NAME_LEN,
};
pub use outcome::Outcome;
pub use requests::{NewComment, NewFollower, NewLike, NewPost, NewUser, UserUpdate};
pub use types::{Comment, FollowLogEntry, Follower, Like, Post, Role, User, UserLike};
