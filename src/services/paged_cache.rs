//! Paged read-through cache over a [`RowSource`].
//!
//! Keeps a small, fixed-capacity pool of page-aligned row blocks and serves
//! single-cell lookups from it, fetching from the source only on a miss.
//! Once the pool is full, a miss replaces the resident page that is
//! "farthest" from the newly needed one.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

use crate::domain::errors::RowSourceResult;
use crate::domain::models::{CacheConfig, CellValue, Page};
use crate::domain::ports::RowSource;

/// Counters describing how a cache instance has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Successful `fetch_page` calls, including initial population and refreshes.
    pub fetches: u64,
    pub refreshes: u64,
}

/// Read-through page cache for one (optionally filtered) view of a row source.
///
/// All operations take `&mut self`, so one instance is only ever driven by a
/// single caller at a time. Independent instances share nothing.
pub struct PagedCache<S: RowSource> {
    source: Arc<S>,
    config: CacheConfig,
    /// Resident pages in slot order; `pages.len()` is the number of used slots.
    pages: Vec<Page>,
    row_count: usize,
    stats: CacheStats,
}

impl<S: RowSource> PagedCache<S> {
    /// Create the cache and populate it before returning.
    ///
    /// If the source holds at least one full page of rows, the first two
    /// aligned pages are admitted into slots 0 and 1; otherwise only the page
    /// covering row 0 is admitted. Fails only if the source fails.
    #[instrument(skip_all, fields(page_size = config.page_size(), max_pages = config.max_pages()))]
    pub async fn new(source: Arc<S>, config: CacheConfig) -> RowSourceResult<Self> {
        let row_count = source.row_count(config.filter()).await?;

        let mut cache = Self {
            source,
            pages: Vec::with_capacity(config.max_pages()),
            config,
            row_count,
            stats: CacheStats::default(),
        };

        let page_size = cache.config.page_size();
        let first = cache.fetch(0).await?;
        if row_count >= page_size {
            let second = cache.fetch(page_size).await?;
            cache.admit(first);
            cache.admit(second);
        } else {
            cache.admit(first);
        }

        info!(
            row_count,
            used_pages = cache.used_pages(),
            filtered = cache.config.filter().is_some(),
            "paged cache populated"
        );
        Ok(cache)
    }

    /// Look up the cell at `row` / `column`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - the cell the source supplied for that position
    /// * `Ok(None)` - the covering page holds no row (or no such column) there
    /// * `Err(RowSourceError)` - a miss fetch failed; the pool is unchanged
    pub async fn retrieve_element(
        &mut self,
        row: usize,
        column: usize,
    ) -> RowSourceResult<Option<CellValue>> {
        if let Some(slot) = self.find_slot(row) {
            self.stats.hits += 1;
            trace!(row, column, slot, "page hit");
            return Ok(self.cell_in_slot(slot, row, column));
        }

        self.stats.misses += 1;
        let page = self.fetch(row).await?;
        let slot = self.admit(page);
        debug!(row, column, slot, used_pages = self.used_pages(), "page miss admitted");

        Ok(self.cell_in_slot(slot, row, column))
    }

    /// Re-fetch resident pages touched by an edit of rows `min..=max`.
    ///
    /// Every resident slot covering `min` or `max` gets the page aligned to
    /// `min` re-fetched into it; its bounds and the pool occupancy stay as
    /// they are. A source failure stops the pass and is returned; slots
    /// refreshed before it keep their new rows.
    #[instrument(skip(self))]
    pub async fn refresh_cache_by_range(&mut self, min: usize, max: usize) -> RowSourceResult<()> {
        let start = self.config.bounds().lower_boundary(min);

        for slot in 0..self.pages.len() {
            let page = &self.pages[slot];
            // One refresh per slot, whichever end of the range it covers.
            if !(page.covers(min) || page.covers(max)) {
                continue;
            }

            let rows = self
                .source
                .fetch_page(start, self.config.page_size(), self.config.filter())
                .await?;
            self.stats.fetches += 1;
            self.stats.refreshes += 1;
            self.pages[slot].replace_rows(rows);
            debug!(slot, start, "resident page refreshed");
        }

        Ok(())
    }

    /// Column names of the underlying source.
    pub async fn columns(&self) -> RowSourceResult<Vec<String>> {
        self.source.columns().await
    }

    /// Row count observed when the cache was populated.
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn used_pages(&self) -> usize {
        self.pages.len()
    }

    /// `(lowest, highest)` bounds of each resident page, in slot order.
    pub fn resident_bounds(&self) -> Vec<(usize, usize)> {
        self.pages
            .iter()
            .map(|p| (p.lowest_index(), p.highest_index()))
            .collect()
    }

    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    fn find_slot(&self, row: usize) -> Option<usize> {
        self.pages.iter().position(|page| page.covers(row))
    }

    fn cell_in_slot(&self, slot: usize, row: usize, column: usize) -> Option<CellValue> {
        let page = &self.pages[slot];
        if page.is_empty() {
            return None;
        }
        page.cell(self.config.bounds().local_offset(row), column).cloned()
    }

    /// Fetch the aligned page covering `row`. Does not touch the pool.
    async fn fetch(&mut self, row: usize) -> RowSourceResult<Page> {
        let bounds = self.config.bounds();
        let start = bounds.lower_boundary(row);
        let rows = self
            .source
            .fetch_page(start, bounds.page_size(), self.config.filter())
            .await?;
        self.stats.fetches += 1;
        trace!(start, returned = rows.len(), "page fetched");
        Ok(Page::covering(row, bounds, rows))
    }

    /// Place `page` into the pool and return its slot.
    fn admit(&mut self, page: Page) -> usize {
        if self.pages.len() < self.config.max_pages() {
            self.pages.push(page);
            return self.pages.len() - 1;
        }

        let victim = eviction_candidate(&self.pages, &page);
        debug!(
            slot = victim,
            evicted_low = self.pages[victim].lowest_index(),
            admitted_low = page.lowest_index(),
            "evicting resident page"
        );
        self.stats.evictions += 1;
        self.pages[victim] = page;
        victim
    }
}

/// Slot of the resident page farthest from `incoming`.
///
/// Scans left to right and keeps the first maximum, so equal distances
/// always resolve to the lowest slot.
fn eviction_candidate(resident: &[Page], incoming: &Page) -> usize {
    let mut victim = 0;
    let mut farthest = f64::NEG_INFINITY;

    for (slot, page) in resident.iter().enumerate() {
        let distance = eviction_distance(incoming, page);
        if distance > farthest {
            farthest = distance;
            victim = slot;
        }
    }

    victim
}

/// `sqrt((new_high - resident_high)^2 + (new_low - resident_high)^2)`
///
/// Both terms measure against the resident page's high bound.
fn eviction_distance(incoming: &Page, resident: &Page) -> f64 {
    let resident_high = resident.highest_index() as f64;
    let high = incoming.highest_index() as f64 - resident_high;
    let low = incoming.lowest_index() as f64 - resident_high;
    high.mul_add(high, low * low).sqrt()
}
