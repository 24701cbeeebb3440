//! Port trait definitions (Hexagonal Architecture)
//!
//! - RowSource: row count, column names and page fetches for the cache
//!
//! Adapters in `crate::adapters` implement these so that the cache stays
//! independent of any particular storage engine.

pub mod row_source;

pub use row_source::RowSource;
