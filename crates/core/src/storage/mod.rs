mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result, TableError, DUPLICATE_LIKE_MESSAGE};
pub use traits::{
    CommentRepository, FollowerRepository, LikeRepository, PostRepository, SocialRepository,
    TableRepository, UserRepository,
};
pub use types::{Cell, Table, TableData, TableRow};
