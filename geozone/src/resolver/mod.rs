//! Zone resolution against the published index snapshot.
//!
//! [`ZoneResolver`] owns the [`SnapshotCell`] and turns a coordinate into a
//! [`ResolutionResult`]. A point covered by no zone is a successful
//! [`ResolutionResult::Unserviceable`] outcome; the only failure is
//! [`ResolveError::IndexUnavailable`], raised while no zone data has ever been
//! installed.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, trace};

use crate::coord::Coordinate;
use crate::geo_index::{IndexConfig, IndexSnapshot, SnapshotCell, SpatialIndex};
use crate::zone::{ZoneId, ZoneSet};

/// Outcome of resolving a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolutionResult {
    /// The coordinate lies in this zone.
    Serviceable(ZoneId),
    /// No active zone covers the coordinate.
    Unserviceable,
}

impl ResolutionResult {
    pub fn is_serviceable(&self) -> bool {
        matches!(self, Self::Serviceable(_))
    }

    /// The resolved zone, if any.
    pub fn zone_id(&self) -> Option<&ZoneId> {
        match self {
            Self::Serviceable(id) => Some(id),
            Self::Unserviceable => None,
        }
    }
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serviceable(id) => write!(f, "serviceable ({})", id),
            Self::Unserviceable => write!(f, "unserviceable"),
        }
    }
}

/// A resolution and the snapshot generation it was computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub result: ResolutionResult,
    pub generation: u64,
}

/// Resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No index has been successfully built yet.
    #[error("zone index unavailable: no zone data has been loaded")]
    IndexUnavailable,
}

/// Resolves coordinates against the latest installed zone snapshot.
pub struct ZoneResolver {
    snapshots: SnapshotCell,
    config: IndexConfig,
    queries: AtomicU64,
}

impl ZoneResolver {
    /// A resolver with no snapshot; every resolve fails until [`install`](Self::install).
    pub fn new(config: IndexConfig) -> Self {
        Self {
            snapshots: SnapshotCell::new(),
            config,
            queries: AtomicU64::new(0),
        }
    }

    /// Build an index over `zones` and publish it. Returns the new generation.
    ///
    /// The index is built before any lock is taken; in-flight queries keep
    /// the snapshot they already hold.
    pub fn install(&self, zones: ZoneSet) -> u64 {
        let index = SpatialIndex::build(Arc::new(zones), &self.config);
        self.install_index(index)
    }

    /// Publish an index built elsewhere (e.g. on a blocking thread).
    pub fn install_index(&self, index: SpatialIndex) -> u64 {
        let zone_count = index.zone_count();
        let cell_count = index.cell_count();
        let version = index.zones().version();
        let generation = self.snapshots.publish(index);
        info!(
            generation,
            zone_count, cell_count, version, "Zone snapshot installed"
        );
        generation
    }

    /// Resolve a coordinate to a zone.
    pub fn resolve(&self, coord: &Coordinate) -> Result<Resolution, ResolveError> {
        let snapshot = self.snapshots.load().ok_or(ResolveError::IndexUnavailable)?;
        self.queries.fetch_add(1, Ordering::Relaxed);

        let started = Instant::now();
        let result = match snapshot.index().best_match(coord) {
            Some(zone) => ResolutionResult::Serviceable(zone.id().clone()),
            None => ResolutionResult::Unserviceable,
        };
        trace!(
            %coord,
            %result,
            generation = snapshot.generation(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Resolved coordinate"
        );

        Ok(Resolution {
            result,
            generation: snapshot.generation(),
        })
    }

    /// The current snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.snapshots.load()
    }

    /// Whether a snapshot has been installed.
    pub fn is_ready(&self) -> bool {
        self.snapshots.generation() > 0
    }

    /// Generation of the latest installed snapshot (0 before the first).
    pub fn generation(&self) -> u64 {
        self.snapshots.generation()
    }

    /// Index configuration used for every install.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of spatial queries performed.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

impl Default for ZoneResolver {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}
