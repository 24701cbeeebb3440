//! In-memory row source for hosts that already hold their rows.

pub mod row_source;

pub use row_source::MemoryRowSource;
