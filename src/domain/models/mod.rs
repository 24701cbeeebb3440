pub mod cache_config;
pub mod config;
pub mod page;

pub use cache_config::{CacheConfig, RowFilter, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
pub use config::{CacheSettings, Config, DatabaseConfig, LogFormat, LoggingConfig, RotationPolicy};
pub use page::{CellValue, Page, PageBounds, Row, RowTable};
