//! Domain errors for the rowpager cache.

use thiserror::Error;

/// Errors raised by a [`RowSource`](crate::domain::ports::RowSource).
///
/// The paged cache never produces these itself; it hands them back to its
/// caller exactly as the source reported them.
#[derive(Debug, Error)]
pub enum RowSourceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column '{column}' in {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Failed to decode column '{column}': {reason}")]
    Decode { column: String, reason: String },

    #[error("Row source unavailable: {0}")]
    Unavailable(String),
}

pub type RowSourceResult<T> = Result<T, RowSourceError>;

impl From<sqlx::Error> for RowSourceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Invalid settings, caught when a configuration value is built or loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid page_size: {0}. Must be at least 1")]
    InvalidPageSize(usize),

    #[error("Invalid max_pages: {0}. Must be at least 2")]
    InvalidMaxPages(usize),

    #[error("Filter field cannot be empty")]
    EmptyFilterField,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),
}
