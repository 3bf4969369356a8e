//! Serviceability cache.
//!
//! Memoizes resolution results per quantized location bucket with LRU
//! eviction, time-to-live expiry, and generation-aware invalidation on zone
//! refresh.

mod bucket;
mod config;
mod memory;
mod stats;

pub use bucket::BucketKey;
pub use config::CacheConfig;
pub use memory::ServiceabilityCache;
pub use stats::CacheStats;
