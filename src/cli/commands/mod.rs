//! CLI command implementations.

pub mod browse;
pub mod cell;
pub mod columns;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::sqlite::{open_database, SqliteTableSource};
use crate::cli::types::ViewArgs;
use crate::domain::models::{CacheConfig, Config, RowFilter};
use crate::services::PagedCache;

/// Open `table` from the configured database as a row source.
pub async fn open_table(config: &Config, table: &str) -> Result<Arc<SqliteTableSource>> {
    let pool = open_database(&config.database.path, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.path))?;

    let source = SqliteTableSource::open(pool, table)
        .await
        .with_context(|| format!("Failed to open table {table}"))?;

    Ok(Arc::new(source))
}

/// Cache configuration for one view: configured sizing, CLI overrides, filter.
pub fn view_config(config: &Config, view: &ViewArgs) -> Result<CacheConfig> {
    let page_size = view.page_size.unwrap_or(config.cache.page_size);
    let max_pages = view.max_pages.unwrap_or(config.cache.max_pages);

    let cache_config = CacheConfig::new(page_size, max_pages)?;
    let cache_config = match (&view.filter_field, &view.filter_value) {
        (Some(field), Some(value)) => cache_config.with_filter(RowFilter::new(field, value))?,
        _ => cache_config,
    };

    Ok(cache_config)
}

/// Open `table` and wrap it in a populated page cache.
pub async fn open_view(config: &Config, table: &str, view: &ViewArgs) -> Result<PagedCache<SqliteTableSource>> {
    let cache_config = view_config(config, view)?;
    let source = open_table(config, table).await?;

    PagedCache::new(source, cache_config)
        .await
        .with_context(|| format!("Failed to load rows from {table}"))
}
