//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. The integrity rules (cascade, duplicate-like guard,
//! timestamp refresh, follow log) live here as DDL and triggers.

use socialdb_core::storage::Table;

/// Per-connection settings. Must run outside a transaction.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create all tables, triggers and views.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS User (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL
);

-- Posts table
CREATE TABLE IF NOT EXISTS Post (
    post_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    post_content TEXT NOT NULL,
    created_date TEXT NOT NULL,
    updated_date TEXT,
    FOREIGN KEY (user_id) REFERENCES User(user_id)
);

-- Comments belong to a post and go away with it
CREATE TABLE IF NOT EXISTS Comment (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    comment_content TEXT NOT NULL,
    comment_date TEXT NOT NULL,
    FOREIGN KEY (post_id) REFERENCES Post(post_id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES User(user_id)
);

-- Likes keep their post_id after the post is deleted, so it carries no constraint
CREATE TABLE IF NOT EXISTS Likes (
    like_id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    like_date TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES User(user_id)
);

-- user_id is followed by follower_user_id
CREATE TABLE IF NOT EXISTS Follower (
    follower_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    follower_user_id INTEGER NOT NULL,
    follow_date TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES User(user_id),
    FOREIGN KEY (follower_user_id) REFERENCES User(user_id)
);

-- Append-only mirror of Follower inserts. Unconstrained, so entries outlive
-- the follow and both users
CREATE TABLE IF NOT EXISTS FollowLog (
    log_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    follower_user_id INTEGER NOT NULL,
    follow_date TEXT NOT NULL
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_post_user_id ON Post(user_id);
CREATE INDEX IF NOT EXISTS idx_comment_post_id ON Comment(post_id);
CREATE INDEX IF NOT EXISTS idx_likes_post_user ON Likes(post_id, user_id);
CREATE INDEX IF NOT EXISTS idx_follower_user_id ON Follower(user_id);

-- Refresh updated_date on every update of a post
CREATE TRIGGER IF NOT EXISTS update_post_timestamp
AFTER UPDATE ON Post
BEGIN
    UPDATE Post SET updated_date = CURRENT_TIMESTAMP WHERE post_id = NEW.post_id;
END;

-- A user may like a post once
CREATE TRIGGER IF NOT EXISTS prevent_duplicate_like
BEFORE INSERT ON Likes
FOR EACH ROW
BEGIN
    SELECT CASE
        WHEN (SELECT COUNT(*) FROM Likes WHERE post_id = NEW.post_id AND user_id = NEW.user_id) > 0
        THEN RAISE(ABORT, 'User has already liked this post.')
    END;
END;

-- Mirror every follow into the log
CREATE TRIGGER IF NOT EXISTS log_follow_activity
AFTER INSERT ON Follower
BEGIN
    INSERT INTO FollowLog (user_id, follower_user_id, follow_date)
    VALUES (NEW.user_id, NEW.follower_user_id, NEW.follow_date);
END;

CREATE VIEW IF NOT EXISTS UserLikes AS
SELECT
    User.user_id,
    User.first_name,
    User.last_name,
    User.email,
    Likes.like_id,
    Likes.post_id,
    Likes.like_date
FROM User
JOIN Likes ON User.user_id = Likes.user_id;
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO User (first_name, last_name, email, password, role)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT user_id, first_name, last_name, email, password, role
FROM User
WHERE user_id = ?1
"#;

pub const UPDATE_USER: &str = r#"
UPDATE User
SET first_name = ?2, last_name = ?3, email = ?4, password = ?5
WHERE user_id = ?1
"#;

// Post queries
pub const INSERT_POST: &str = r#"
INSERT INTO Post (user_id, post_content, created_date)
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_POST_BY_ID: &str = r#"
SELECT post_id, user_id, post_content, created_date, updated_date
FROM Post
WHERE post_id = ?1
"#;

pub const UPDATE_POST: &str = r#"
UPDATE Post
SET post_content = ?2
WHERE post_id = ?1
"#;

// Comment queries
pub const INSERT_COMMENT: &str = r#"
INSERT INTO Comment (post_id, user_id, comment_content, comment_date)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const UPDATE_COMMENT: &str = r#"
UPDATE Comment
SET comment_content = ?2
WHERE comment_id = ?1
"#;

// Like queries
pub const INSERT_LIKE: &str = r#"
INSERT INTO Likes (post_id, user_id, like_date)
VALUES (?1, ?2, ?3)
"#;

// Follower queries
pub const INSERT_FOLLOWER: &str = r#"
INSERT INTO Follower (user_id, follower_user_id, follow_date)
VALUES (?1, ?2, ?3)
"#;

/// `SELECT *` over a table or view, ordered by its first column.
///
/// Names come from [`Table`], never from user input.
pub fn select_all(table: Table) -> String {
    let order = match table {
        Table::UserLikes => "like_id",
        _ => table.columns()[0],
    };
    format!("SELECT * FROM \"{}\" ORDER BY {} ASC", table.name(), order)
}

/// Delete-by-key statement, or `None` for tables without a key column.
pub fn delete_by_id(table: Table) -> Option<String> {
    table
        .id_column()
        .map(|id| format!("DELETE FROM \"{}\" WHERE {} = ?1", table.name(), id))
}
