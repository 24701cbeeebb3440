//! Per-instance configuration for a paged cache.

use serde::{Deserialize, Serialize};

use super::page::PageBounds;
use crate::domain::errors::ConfigError;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Resident page slots when nothing else is configured.
pub const DEFAULT_MAX_PAGES: usize = 8;

/// A single equality filter (`field = value`) scoping a whole cache instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilter {
    pub field: String,
    pub value: String,
}

impl RowFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Immutable cache configuration.
///
/// Validated on construction so that a `PagedCache` built from it can only
/// fail because of its row source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    page_size: usize,
    max_pages: usize,
    filter: Option<RowFilter>,
}

impl CacheConfig {
    /// `max_pages` must be at least 2, because initial population may admit
    /// two pages.
    pub fn new(page_size: usize, max_pages: usize) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize(page_size));
        }
        if max_pages < 2 {
            return Err(ConfigError::InvalidMaxPages(max_pages));
        }
        Ok(Self {
            page_size,
            max_pages,
            filter: None,
        })
    }

    /// Scope the cache to rows where `filter.field == filter.value`.
    pub fn with_filter(mut self, filter: RowFilter) -> Result<Self, ConfigError> {
        if filter.field.trim().is_empty() {
            return Err(ConfigError::EmptyFilterField);
        }
        self.filter = Some(filter);
        Ok(self)
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub const fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub const fn filter(&self) -> Option<&RowFilter> {
        self.filter.as_ref()
    }

    pub const fn bounds(&self) -> PageBounds {
        PageBounds::new(self.page_size)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            filter: None,
        }
    }
}
