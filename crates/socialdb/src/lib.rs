//! socialdb - users, posts, comments, likes and follows over one store handle.
//!
//! [`service::SocialService`] is the access layer; [`storage`] holds the SQLite
//! and in-memory backends it runs on.

pub mod cli;
pub mod config;
pub mod output;
pub mod service;
pub mod storage;

pub use service::{ListError, SocialService};
