//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `socialdb_core::storage`:
//!
//! - [`SqliteRepository`]: file or in-memory SQLite, rules enforced by the schema
//! - [`InMemoryRepository`]: process-local maps, rules enforced in code
//!
//! Both behave the same through [`crate::service::SocialService`].

pub mod inmemory;
pub mod sqlite;

pub use inmemory::InMemoryRepository;
pub use sqlite::SqliteRepository;
