use std::env;

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "social_media_management.db";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to SQLite database file (default: "social_media_management.db")
    pub database_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SOCIALDB_PATH` - SQLite database path (default: "social_media_management.db")
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("SOCIALDB_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
        }
    }

    /// Replace the database path when one was given on the command line.
    pub fn with_database(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.database_path = path;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
