use thiserror::Error;

/// Errors that can occur when resolving a table name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Unknown table: {0}")]
    Unknown(String),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    /// A store rule aborted the write. Carries the rule's own message.
    #[error("{0}")]
    Rejected(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn foreign_key(entity_type: &'static str) -> Self {
        Self::InvalidData(format!(
            "Foreign key constraint violation for {entity_type}"
        ))
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Abort message of the duplicate-like rule.
pub const DUPLICATE_LIKE_MESSAGE: &str = "User has already liked this post.";
