//! Zone repository backed by a local JSON file.

use std::path::{Path, PathBuf};

use super::error::RepositoryError;
use super::record::parse_zones;
use super::ZoneRepository;
use crate::zone::ZoneSet;

/// Reads zone records from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileZoneRepository {
    path: PathBuf,
}

impl FileZoneRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ZoneRepository for FileZoneRepository {
    async fn load_zones(&self) -> Result<ZoneSet, RepositoryError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| RepositoryError::Unavailable(format!("{}: {}", self.path.display(), e)))?;

        let parsed = parse_zones(&bytes)?;

        tracing::debug!(
            path = %self.path.display(),
            zones = parsed.zones.len(),
            skipped = parsed.skipped.len(),
            "Zone file loaded"
        );

        Ok(parsed.zones)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
