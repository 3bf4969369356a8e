//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants, clamp helpers, and the
//! `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::geo_index::{MAX_CELL_SIZE_DEG, MIN_CELL_SIZE_DEG};

pub use crate::geo_index::DEFAULT_CELL_SIZE_DEG;

// =============================================================================
// Source
// =============================================================================

/// Default zone file name inside the config directory.
pub const DEFAULT_ZONES_FILE: &str = "zones.json";

/// Default per-request timeout for zone source reads.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Cache
// =============================================================================

/// Default maximum number of cached buckets.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Default cache entry time-to-live (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default bucket precision: 3 decimal places is ~110 m of latitude.
pub const DEFAULT_BUCKET_PRECISION: u8 = 3;

/// Finest accepted bucket precision (~11 cm).
pub const MAX_BUCKET_PRECISION: u8 = 6;

// =============================================================================
// Refresh
// =============================================================================

/// Default interval between scheduled refreshes (10 minutes).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 600;

/// Default cap on failure backoff (5 minutes).
pub const DEFAULT_MAX_BACKOFF_SECS: u64 = 300;

/// Default deadline for a single zone load.
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 30;

/// Clamps the index cell size to its valid range and logs a warning if clamped.
pub(super) fn clamp_cell_size(value: f64) -> f64 {
    if value < MIN_CELL_SIZE_DEG {
        tracing::warn!(
            requested = value,
            min = MIN_CELL_SIZE_DEG,
            max = MAX_CELL_SIZE_DEG,
            "cell_size_deg below minimum, clamping to {}",
            MIN_CELL_SIZE_DEG
        );
        MIN_CELL_SIZE_DEG
    } else if value > MAX_CELL_SIZE_DEG {
        tracing::warn!(
            requested = value,
            min = MIN_CELL_SIZE_DEG,
            max = MAX_CELL_SIZE_DEG,
            "cell_size_deg above maximum, clamping to {}",
            MAX_CELL_SIZE_DEG
        );
        MAX_CELL_SIZE_DEG
    } else {
        value
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            source: SourceSettings {
                source_type: SourceType::File,
                path: config_dir.join(DEFAULT_ZONES_FILE),
                url: None,
                api_key: None,
                timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
            },
            index: IndexSettings {
                cell_size_deg: DEFAULT_CELL_SIZE_DEG,
            },
            cache: CacheSettings {
                capacity: DEFAULT_CACHE_CAPACITY,
                ttl_secs: DEFAULT_CACHE_TTL_SECS,
                bucket_precision: DEFAULT_BUCKET_PRECISION,
            },
            refresh: RefreshSettings {
                interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
                max_backoff_secs: DEFAULT_MAX_BACKOFF_SECS,
                load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                file: config_dir.join("geozone.log"),
            },
        }
    }
}
