//! Page domain model.
//!
//! A page is one page-aligned, fixed-size block of rows fetched from a row
//! source. Its bounds always span exactly `page_size` indices, even when the
//! source delivered fewer rows (or none) for that range.

use serde::Serialize;
use std::fmt;

/// A single cell as delivered by a row source.
///
/// `Null` is a real value (the column is SQL NULL). The absence of a value,
/// e.g. a lookup past the end of the dataset, is expressed with `Option::None`
/// by the cache instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Blob(bytes) => {
                write!(f, "X'")?;
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                write!(f, "'")
            }
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// One row of cells, in column order.
pub type Row = Vec<CellValue>;

/// An ordered table of rows, as returned by a single page fetch.
pub type RowTable = Vec<Row>;

/// Page-boundary arithmetic for a fixed page size.
///
/// Every page the cache admits is aligned with these two functions, never
/// with the literal row index that caused the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    page_size: usize,
}

impl PageBounds {
    /// `page_size` must be at least 1; `CacheConfig` guarantees this.
    pub const fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// `floor(row / page_size) * page_size`
    pub const fn lower_boundary(&self, row: usize) -> usize {
        (row / self.page_size) * self.page_size
    }

    /// `lower_boundary(row) + page_size - 1`, clamped to `usize::MAX` for
    /// the last, partial page of the index space.
    pub const fn upper_boundary(&self, row: usize) -> usize {
        self.lower_boundary(row).saturating_add(self.page_size - 1)
    }

    /// Offset of `row` inside the page that covers it.
    pub const fn local_offset(&self, row: usize) -> usize {
        row % self.page_size
    }
}

/// A resident block of rows with its inclusive, page-aligned bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    rows: RowTable,
    lowest_index: usize,
    highest_index: usize,
}

impl Page {
    /// Build the page covering `row`, holding the rows fetched for it.
    pub fn covering(row: usize, bounds: PageBounds, rows: RowTable) -> Self {
        Self {
            rows,
            lowest_index: bounds.lower_boundary(row),
            highest_index: bounds.upper_boundary(row),
        }
    }

    pub const fn lowest_index(&self) -> usize {
        self.lowest_index
    }

    pub const fn highest_index(&self) -> usize {
        self.highest_index
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `row` falls within this page's bounds.
    pub const fn covers(&self, row: usize) -> bool {
        self.lowest_index <= row && row <= self.highest_index
    }

    /// Swap the row table, keeping the bounds.
    pub fn replace_rows(&mut self, rows: RowTable) {
        self.rows = rows;
    }

    /// Cell at `local_row` / `column`, if the page holds one there.
    pub fn cell(&self, local_row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(local_row).and_then(|row| row.get(column))
    }
}
