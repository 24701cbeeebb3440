//! Common test utilities for integration tests
//!
//! Provides a row source that records every call and can be told to fail,
//! plus shared fixtures used across multiple integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use rowpager::adapters::memory::MemoryRowSource;
use rowpager::{CellValue, RowFilter, RowSource, RowSourceError, RowSourceResult, RowTable};

/// One recorded `fetch_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub start: usize,
    pub page_size: usize,
    pub filter: Option<RowFilter>,
}

/// Row source wrapper that counts calls and injects failures on demand.
pub struct CountingSource {
    inner: Mutex<MemoryRowSource>,
    fetches: Mutex<Vec<FetchCall>>,
    count_calls: AtomicUsize,
    failing: AtomicBool,
}

impl CountingSource {
    pub fn new(inner: MemoryRowSource) -> Self {
        Self {
            inner: Mutex::new(inner),
            fetches: Mutex::new(Vec::new()),
            count_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// `rows` rows of `id`, `parity` ("even"/"odd") and `label` ("row-N").
    pub fn numbered(rows: usize) -> Self {
        Self::new(numbered_rows(rows))
    }

    pub fn fetch_log(&self) -> Vec<FetchCall> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    pub fn last_fetch_start(&self) -> Option<usize> {
        self.fetches.lock().unwrap().last().map(|call| call.start)
    }

    pub fn row_count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Overwrite one cell of the underlying data.
    pub fn set_cell(&self, row: usize, column: usize, value: CellValue) {
        let mut inner = self.inner.lock().unwrap();
        let mut rows = inner.rows().clone();
        rows[row][column] = value;
        *inner = MemoryRowSource::new(column_names(), rows);
    }

    fn snapshot(&self) -> MemoryRowSource {
        self.inner.lock().unwrap().clone()
    }

    fn check_failing(&self) -> RowSourceResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RowSourceError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RowSource for CountingSource {
    async fn row_count(&self, filter: Option<&RowFilter>) -> RowSourceResult<usize> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        self.snapshot().row_count(filter).await
    }

    async fn columns(&self) -> RowSourceResult<Vec<String>> {
        self.snapshot().columns().await
    }

    async fn fetch_page(
        &self,
        start: usize,
        page_size: usize,
        filter: Option<&RowFilter>,
    ) -> RowSourceResult<RowTable> {
        self.check_failing()?;
        self.fetches.lock().unwrap().push(FetchCall {
            start,
            page_size,
            filter: filter.cloned(),
        });
        self.snapshot().fetch_page(start, page_size, filter).await
    }
}

pub fn column_names() -> Vec<String> {
    vec!["id".to_string(), "parity".to_string(), "label".to_string()]
}

pub fn numbered_rows(rows: usize) -> MemoryRowSource {
    let data = (0..rows)
        .map(|i| {
            vec![
                CellValue::Integer(i64::try_from(i).unwrap()),
                CellValue::from(if i % 2 == 0 { "even" } else { "odd" }),
                CellValue::Text(format!("row-{i}")),
            ]
        })
        .collect();
    MemoryRowSource::new(column_names(), data)
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
