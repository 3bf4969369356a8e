//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Zone definition source
    pub source: SourceSettings,
    /// Spatial index tuning
    pub index: IndexSettings,
    /// Serviceability cache settings
    pub cache: CacheSettings,
    /// Background refresh settings
    pub refresh: RefreshSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Where zone definitions are loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// JSON file on disk
    File,
    /// REST endpoint returning the same JSON records
    Http,
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "http" | "https" => Ok(Self::Http),
            other => Err(format!("unknown source type '{}'", other)),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Zone source configuration.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Source type: "file" or "http"
    pub source_type: SourceType,
    /// Zone file path (used when type = file)
    pub path: PathBuf,
    /// Endpoint URL (required when type = http)
    pub url: Option<String>,
    /// API key sent with HTTP requests
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Spatial index configuration.
#[derive(Debug, Clone)]
pub struct IndexSettings {
    /// Grid cell edge in degrees
    pub cell_size_deg: f64,
}

/// Serviceability cache configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Maximum number of cached buckets (0 disables the cache)
    pub capacity: usize,
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
    /// Decimal places kept when bucketing coordinates
    pub bucket_precision: u8,
}

/// Background refresh configuration.
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// Interval between scheduled refreshes in seconds
    pub interval_secs: u64,
    /// Upper bound for failure backoff in seconds
    pub max_backoff_secs: u64,
    /// Overall deadline for one zone load in seconds
    pub load_timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
