//! rowpager - paged read-through row cache
//!
//! Serves single-cell lookups for virtualized grids from a small pool of
//! page-aligned row blocks, fetching from the underlying row source only on
//! a miss.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): page model, cache configuration, the `RowSource` port
//! - **Service Layer** (`services`): the `PagedCache` itself
//! - **Adapters** (`adapters`): SQLite and in-memory row sources
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line table browser
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rowpager::adapters::sqlite::{open_database, SqliteTableSource};
//! use rowpager::{CacheConfig, PagedCache};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = open_database("admin.db", 1).await?;
//!     let source = Arc::new(SqliteTableSource::open(pool, "users").await?);
//!     let mut cache = PagedCache::new(source, CacheConfig::new(500, 8)?).await?;
//!     let name = cache.retrieve_element(700, 1).await?;
//!     println!("{name:?}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ConfigError, RowSourceError, RowSourceResult};
pub use domain::models::{CacheConfig, CellValue, Config, Page, PageBounds, RowFilter, RowTable};
pub use domain::ports::RowSource;
pub use infrastructure::config::ConfigLoader;
pub use services::{CacheStats, PagedCache};
