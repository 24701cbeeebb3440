//! SQLite adapters for rowpager.

pub mod connection;
pub mod table_source;

pub use connection::{create_pool, create_test_pool, database_url, verify_connection, ConnectionError, PoolConfig};
pub use table_source::{quote_identifier, SqliteTableSource};

use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open an existing database read-only and check that it answers.
pub async fn open_database(path_or_url: &str, max_connections: u32) -> Result<SqlitePool, DatabaseError> {
    let config = PoolConfig {
        max_connections,
        ..PoolConfig::default()
    };
    let pool = create_pool(&database_url(path_or_url), Some(config)).await?;
    verify_connection(&pool).await?;
    Ok(pool)
}
