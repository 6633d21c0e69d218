//! CLI command definitions.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};

use socialdb_core::serde::parse_timestamp;
use socialdb_core::social::Role;

/// Social media data manager backed by SQLite.
#[derive(Debug, Parser)]
#[command(name = "socialdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file. Defaults to `social_media_management.db`.
    #[arg(long, short = 'd', env = "SOCIALDB_PATH")]
    pub database: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// CLI role (with clap ValueEnum).
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RoleArg {
    #[default]
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

/// Available commands.
///
/// Dates use `YYYY-MM-DD HH:MM:SS` and default to the current UTC time.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register a user.
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value = "user")]
        role: RoleArg,
    },
    /// Add a post.
    Post {
        /// Author user ID.
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        content: String,
        #[arg(long, value_parser = parse_timestamp)]
        date: Option<NaiveDateTime>,
    },
    /// Comment on a post.
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        content: String,
        #[arg(long, value_parser = parse_timestamp)]
        date: Option<NaiveDateTime>,
    },
    /// Like a post.
    Like {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        user_id: i64,
        #[arg(long, value_parser = parse_timestamp)]
        date: Option<NaiveDateTime>,
    },
    /// Follow a user.
    Follow {
        /// User being followed.
        #[arg(long)]
        user_id: i64,
        /// User doing the following.
        #[arg(long)]
        follower_id: i64,
        #[arg(long, value_parser = parse_timestamp)]
        date: Option<NaiveDateTime>,
    },
    /// Replace the content of a post.
    UpdatePost {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        content: String,
    },
    /// Replace the content of a comment.
    UpdateComment {
        #[arg(long)]
        comment_id: i64,
        #[arg(long)]
        content: String,
    },
    /// Replace a user's names, email and password.
    UpdateUser {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Delete a record from User, Post, Comment, Likes or Follower.
    Delete {
        /// Table name, case-sensitive.
        table: String,
        id: i64,
    },
    /// List a table or the UserLikes view.
    List {
        /// Table or view name, case-sensitive.
        table: String,
    },
    /// List every table.
    ListAll,
}
