//! Domain types, validation and repository contracts for socialdb.
//!
//! Pure data and functions only; storage backends live in the `socialdb` crate.

pub mod serde;
pub mod social;
pub mod storage;
