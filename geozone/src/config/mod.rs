//! Configuration for GeoZone.
//!
//! The user-facing configuration lives in `~/.geozone/config.ini` and is
//! loaded into a [`ConfigFile`]. Each section maps onto one component:
//!
//! - `[source]` selects and configures the zone repository
//! - `[index]` tunes the spatial index grid
//! - `[cache]` bounds the serviceability cache
//! - `[refresh]` drives the background refresh daemon
//! - `[logging]` sets the log file
//!
//! # Example
//!
//! ```
//! use geozone::config::{ConfigFile, SourceType};
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.source.source_type, SourceType::File);
//! assert_eq!(config.cache.bucket_precision, 3);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ConfigFile, IndexSettings, LoggingSettings, RefreshSettings, SourceSettings,
    SourceType,
};
