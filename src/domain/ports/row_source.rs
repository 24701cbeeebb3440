use async_trait::async_trait;

use crate::domain::errors::RowSourceResult;
use crate::domain::models::{RowFilter, RowTable};

/// Row-oriented data source consumed by the paged cache
///
/// Implementations are treated as stateless fetch capabilities: the cache
/// owns every page it admits and never hands state back to the source.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Total number of rows in the dataset, under `filter` if given
    async fn row_count(&self, filter: Option<&RowFilter>) -> RowSourceResult<usize>;

    /// Column names, stable for the lifetime of the dataset
    async fn columns(&self) -> RowSourceResult<Vec<String>>;

    /// Fetch up to `page_size` contiguous rows starting at `start`
    ///
    /// # Returns
    /// * `Ok(rows)` - between zero and `page_size` rows; fewer than
    ///   `page_size` when the dataset ends inside the range
    /// * `Err(RowSourceError)` on a genuine fetch failure, never an empty
    ///   table in its place
    async fn fetch_page(
        &self,
        start: usize,
        page_size: usize,
        filter: Option<&RowFilter>,
    ) -> RowSourceResult<RowTable>;
}
