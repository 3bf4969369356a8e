//! Configuration for the serviceability cache.

use std::time::Duration;

use crate::config::{
    CacheSettings, DEFAULT_BUCKET_PRECISION, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS,
    MAX_BUCKET_PRECISION,
};

/// Serviceability cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of buckets held. Zero disables the cache.
    pub capacity: usize,

    /// How long an entry stays valid after insertion.
    pub ttl: Duration,

    /// Decimal places kept when quantizing coordinates (0 to 6).
    pub bucket_precision: u8,
}

impl CacheConfig {
    /// Create a cache configuration.
    ///
    /// Precision above the supported maximum is clamped.
    pub fn new(capacity: usize, ttl: Duration, bucket_precision: u8) -> Self {
        Self {
            capacity,
            ttl,
            bucket_precision: bucket_precision.min(MAX_BUCKET_PRECISION),
        }
    }

    /// A configuration that caches nothing.
    pub fn disabled() -> Self {
        Self {
            capacity: 0,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_bucket_precision(mut self, precision: u8) -> Self {
        self.bucket_precision = precision.min(MAX_BUCKET_PRECISION);
        self
    }

    /// Whether caching is enabled at all.
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }
}

impl Default for CacheConfig {
    /// Default configuration: 10 000 buckets, 5 minute TTL, ~110 m buckets.
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            bucket_precision: DEFAULT_BUCKET_PRECISION,
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self::new(
            settings.capacity,
            Duration::from_secs(settings.ttl_secs),
            settings.bucket_precision,
        )
    }
}
