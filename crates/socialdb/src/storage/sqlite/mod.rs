//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the repository traits
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.
//! Foreign keys, the post cascade and the three triggers are declared in the schema.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
