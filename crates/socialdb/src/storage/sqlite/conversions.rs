//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::NaiveDateTime;
use rusqlite::types::{Type, ValueRef};
use rusqlite::Row;
use socialdb_core::serde::parse_timestamp;
use socialdb_core::social::{Post, Role, User};
use socialdb_core::storage::Cell;

// ============================================================================
// Typed rows
// ============================================================================

/// Expected columns: user_id, first_name, last_name, email, password, role
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get(5)?;

    Ok(User {
        user_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
        role: parse_role(5, &role)?,
    })
}

/// Expected columns: post_id, user_id, post_content, created_date, updated_date
pub fn row_to_post(row: &Row) -> rusqlite::Result<Post> {
    let created_date: String = row.get(3)?;
    let updated_date: Option<String> = row.get(4)?;

    Ok(Post {
        post_id: row.get(0)?,
        user_id: row.get(1)?,
        post_content: row.get(2)?,
        created_date: parse_datetime(3, &created_date)?,
        updated_date: updated_date
            .map(|s| parse_datetime(4, &s))
            .transpose()?,
    })
}

// ============================================================================
// Untyped rows
// ============================================================================

/// Convert every column of a row into cells.
pub fn row_to_cells(row: &Row, column_count: usize) -> rusqlite::Result<Vec<Cell>> {
    (0..column_count)
        .map(|idx| row.get_ref(idx).map(value_to_cell))
        .collect()
}

/// Convert a raw SQLite value into a cell. Blobs are rendered as lossy UTF-8.
pub fn value_to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(f) => Cell::Real(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Cell::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn parse_role(idx: usize, s: &str) -> rusqlite::Result<Role> {
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<NaiveDateTime> {
    parse_timestamp(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
