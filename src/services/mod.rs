pub mod paged_cache;

pub use paged_cache::{CacheStats, PagedCache};
