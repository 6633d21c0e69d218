use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TableError;
use crate::serde::format_timestamp;
use crate::social::{Comment, FollowLogEntry, Follower, Like, Post, User, UserLike};

/// Every table and view in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    User,
    Post,
    Comment,
    Likes,
    Follower,
    FollowLog,
    UserLikes,
}

impl Table {
    /// Base tables in listing order. The `UserLikes` view is listed separately.
    pub const ALL: [Table; 6] = [
        Table::User,
        Table::Post,
        Table::Comment,
        Table::Likes,
        Table::Follower,
        Table::FollowLog,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::User => "User",
            Table::Post => "Post",
            Table::Comment => "Comment",
            Table::Likes => "Likes",
            Table::Follower => "Follower",
            Table::FollowLog => "FollowLog",
            Table::UserLikes => "UserLikes",
        }
    }

    /// Key column used by delete-by-id.
    ///
    /// `None` for the follow log and the view, which cannot be deleted from.
    pub fn id_column(&self) -> Option<&'static str> {
        match self {
            Table::User => Some("user_id"),
            Table::Post => Some("post_id"),
            Table::Comment => Some("comment_id"),
            Table::Likes => Some("like_id"),
            Table::Follower => Some("follower_id"),
            Table::FollowLog | Table::UserLikes => None,
        }
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::User => &[
                "user_id",
                "first_name",
                "last_name",
                "email",
                "password",
                "role",
            ],
            Table::Post => &[
                "post_id",
                "user_id",
                "post_content",
                "created_date",
                "updated_date",
            ],
            Table::Comment => &[
                "comment_id",
                "post_id",
                "user_id",
                "comment_content",
                "comment_date",
            ],
            Table::Likes => &["like_id", "post_id", "user_id", "like_date"],
            Table::Follower => &["follower_id", "user_id", "follower_user_id", "follow_date"],
            Table::FollowLog => &["log_id", "user_id", "follower_user_id", "follow_date"],
            Table::UserLikes => &[
                "user_id",
                "first_name",
                "last_name",
                "email",
                "like_id",
                "post_id",
                "like_date",
            ],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .chain(std::iter::once(Table::UserLikes))
            .find(|table| table.name() == s)
            .ok_or_else(|| TableError::Unknown(s.to_string()))
    }
}

/// A single column value as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NULL"),
            Cell::Integer(value) => write!(f, "{value}"),
            Cell::Real(value) => write!(f, "{value}"),
            Cell::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::Text(value.clone())
    }
}

impl From<&chrono::NaiveDateTime> for Cell {
    fn from(value: &chrono::NaiveDateTime) -> Self {
        Cell::Text(format_timestamp(value))
    }
}

impl<T> From<Option<T>> for Cell
where
    Cell: From<T>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Null)
    }
}

/// Full contents of a table or view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub table: Table,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableData {
    pub fn new(table: Table, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            table,
            columns: table.columns().iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Builds the listing from typed rows.
    pub fn from_rows<'a, R, I>(rows: I) -> Self
    where
        R: TableRow + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        Self::new(R::TABLE, rows.into_iter().map(|row| row.cells()).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }
}

/// A typed row that can be projected into a listing.
pub trait TableRow {
    const TABLE: Table;

    /// Cell values in the order of `Self::TABLE.columns()`.
    fn cells(&self) -> Vec<Cell>;
}

impl TableRow for User {
    const TABLE: Table = Table::User;

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.user_id.into(),
            (&self.first_name).into(),
            (&self.last_name).into(),
            (&self.email).into(),
            (&self.password).into(),
            self.role.as_str().into(),
        ]
    }
}

impl TableRow for Post {
    const TABLE: Table = Table::Post;

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.post_id.into(),
            self.user_id.into(),
            (&self.post_content).into(),
            (&self.created_date).into(),
            self.updated_date.as_ref().into(),
        ]
    }
}

impl TableRow for Comment {
    const TABLE: Table = Table::Comment;

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.comment_id.into(),
            self.post_id.into(),
            self.user_id.into(),
            (&self.comment_content).into(),
            (&self.comment_date).into(),
        ]
    }
}

impl TableRow for Like {
    const TABLE: Table = Table::Likes;

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.like_id.into(),
            self.post_id.into(),
            self.user_id.into(),
            (&self.like_date).into(),
        ]
    }
}

impl TableRow for Follower {
    const TABLE: Table = Table::Follower;

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.follower_id.into(),
            self.user_id.into(),
            self.follower_user_id.into(),
            (&self.follow_date).into(),
        ]
    }
}

impl TableRow for FollowLogEntry {
    const TABLE: Table = Table::FollowLog;

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.log_id.into(),
            self.user_id.into(),
            self.follower_user_id.into(),
            (&self.follow_date).into(),
        ]
    }
}

impl TableRow for UserLike {
    const TABLE: Table = Table::UserLikes;

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.user_id.into(),
            (&self.first_name).into(),
            (&self.last_name).into(),
            (&self.email).into(),
            self.like_id.into(),
            self.post_id.into(),
            (&self.like_date).into(),
        ]
    }
}
