pub mod counts;
pub mod detail_cache;
pub mod list_cache;

pub use counts::{refresh_counts, ViewCounts};
pub use detail_cache::{DetailCache, DetailContent};
pub use list_cache::{ListCache, ListFingerprint, ListLoad};
