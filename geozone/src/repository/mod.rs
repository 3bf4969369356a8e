//! Zone repositories.
//!
//! A [`ZoneRepository`] loads the full set of zone definitions from some
//! store. Loads are all-or-nothing at the payload level: an unreachable store
//! or an unparseable payload fails the load, while individual bad records are
//! skipped with a warning (see [`parse_zones`]).
//!
//! Implementations:
//!
//! - [`FileZoneRepository`] reads a JSON file
//! - [`HttpZoneRepository`] fetches the same JSON from a REST endpoint
//! - [`StaticZoneRepository`] serves in-memory records
//!
//! [`ConfiguredRepository`] picks between the file and HTTP variants from the
//! `[source]` config section.

mod error;
mod file;
mod fixture;
mod http;
mod record;

use std::future::Future;
use std::time::Duration;

pub use error::{RecordError, RepositoryError};
pub use file::FileZoneRepository;
pub use fixture::StaticZoneRepository;
pub use http::HttpZoneRepository;
pub use record::{parse_zones, zones_from_records, ParsedZones, SkippedRecord, ZoneRecord};

use crate::config::{SourceSettings, SourceType};
use crate::zone::ZoneSet;

/// Source of zone definitions.
pub trait ZoneRepository: Send + Sync {
    /// Load every zone definition, active and inactive.
    fn load_zones(&self) -> impl Future<Output = Result<ZoneSet, RepositoryError>> + Send;

    /// Short human-readable description of the store, for logs.
    fn describe(&self) -> String;
}

/// Repository chosen from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredRepository {
    File(FileZoneRepository),
    Http(HttpZoneRepository),
}

impl ConfiguredRepository {
    pub fn from_settings(settings: &SourceSettings) -> Result<Self, RepositoryError> {
        match settings.source_type {
            SourceType::File => Ok(Self::File(FileZoneRepository::new(&settings.path))),
            SourceType::Http => {
                let url = settings.url.as_deref().ok_or_else(|| {
                    RepositoryError::Unavailable("no URL configured for http source".to_string())
                })?;
                let repo = HttpZoneRepository::new(
                    url,
                    settings.api_key.as_deref(),
                    Duration::from_secs(settings.timeout_secs),
                )?;
                Ok(Self::Http(repo))
            }
        }
    }
}

impl ZoneRepository for ConfiguredRepository {
    async fn load_zones(&self) -> Result<ZoneSet, RepositoryError> {
        match self {
            Self::File(repo) => repo.load_zones().await,
            Self::Http(repo) => repo.load_zones().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::File(repo) => repo.describe(),
            Self::Http(repo) => repo.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    #[test]
    fn test_file_source_from_defaults() {
        let config = ConfigFile::default();
        let repo = ConfiguredRepository::from_settings(&config.source).unwrap();
        assert!(matches!(repo, ConfiguredRepository::File(_)));
    }

    #[test]
    fn test_http_source_requires_url() {
        let mut settings = ConfigFile::default().source;
        settings.source_type = SourceType::Http;
        settings.url = None;
        assert!(ConfiguredRepository::from_settings(&settings).is_err());

        settings.url = Some("https://zones.example.com/zones".to_string());
        let repo = ConfiguredRepository::from_settings(&settings).unwrap();
        assert_eq!(repo.describe(), "https://zones.example.com/zones");
    }
}
