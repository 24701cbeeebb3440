//! Domain layer for rowpager
//!
//! This module contains the page model, cache configuration and the
//! row source port.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ConfigError, RowSourceError, RowSourceResult};
