use async_trait::async_trait;

use crate::domain::errors::{RowSourceError, RowSourceResult};
use crate::domain::models::{CellValue, Row, RowFilter, RowTable};
use crate::domain::ports::RowSource;

/// Name reported for this source in `UnknownColumn` errors.
const MEMORY_TABLE_NAME: &str = "memory";

/// `Vec`-backed row source.
///
/// Filtering compares the display text of a cell with the filter value;
/// `NULL` cells never match.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSource {
    columns: Vec<String>,
    rows: RowTable,
}

impl MemoryRowSource {
    pub fn new(columns: Vec<String>, rows: RowTable) -> Self {
        Self { columns, rows }
    }

    pub fn rows(&self) -> &RowTable {
        &self.rows
    }

    fn column_index(&self, field: &str) -> RowSourceResult<usize> {
        self.columns
            .iter()
            .position(|c| c == field)
            .ok_or_else(|| RowSourceError::UnknownColumn {
                table: MEMORY_TABLE_NAME.to_string(),
                column: field.to_string(),
            })
    }

    /// Rows visible under `filter`, in storage order.
    fn visible<'a>(
        &'a self,
        filter: Option<&'a RowFilter>,
    ) -> RowSourceResult<Box<dyn Iterator<Item = &'a Row> + Send + 'a>> {
        let Some(filter) = filter else {
            return Ok(Box::new(self.rows.iter()));
        };

        let idx = self.column_index(&filter.field)?;
        Ok(Box::new(self.rows.iter().filter(move |row| {
            row.get(idx)
                .is_some_and(|cell| cell_matches(cell, &filter.value))
        })))
    }
}

fn cell_matches(cell: &CellValue, value: &str) -> bool {
    !cell.is_null() && cell.to_string() == value
}

#[async_trait]
impl RowSource for MemoryRowSource {
    async fn row_count(&self, filter: Option<&RowFilter>) -> RowSourceResult<usize> {
        Ok(self.visible(filter)?.count())
    }

    async fn columns(&self) -> RowSourceResult<Vec<String>> {
        Ok(self.columns.clone())
    }

    async fn fetch_page(
        &self,
        start: usize,
        page_size: usize,
        filter: Option<&RowFilter>,
    ) -> RowSourceResult<RowTable> {
        Ok(self
            .visible(filter)?
            .skip(start)
            .take(page_size)
            .cloned()
            .collect())
    }
}
