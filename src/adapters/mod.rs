//! Row source adapters.

pub mod memory;
pub mod sqlite;
