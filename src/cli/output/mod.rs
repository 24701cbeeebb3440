//! CLI output formatting module

pub mod table;

pub use table::{DisplayRow, TableFormatter};
