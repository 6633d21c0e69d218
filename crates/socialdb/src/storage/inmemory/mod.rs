//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of the repository traits
//! that keeps every table in a `BTreeMap` behind one `Arc<RwLock<_>>`. The
//! integrity rules the SQLite schema declares are checked in code here, in the
//! same order SQLite applies them.
//!
//! # Example
//!
//! ```rust,ignore
//! use socialdb::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! let service = SocialService::new(repo);
//! ```

mod repository;

pub use repository::InMemoryRepository;
