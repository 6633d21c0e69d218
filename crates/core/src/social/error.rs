use thiserror::Error;

/// Errors raised while validating input before it reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{field} too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}
