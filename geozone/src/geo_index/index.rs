//! Grid-partitioned zone lookup.
//!
//! Each active zone is registered in every grid cell its bounding box
//! overlaps. A query looks up the single cell holding the point, filters the
//! registered zones by bounding box, then runs the exact containment test on
//! whatever remains. Work per query is bounded by the zones sharing one cell,
//! not by the total zone count.
//!
//! Zones whose bounding box would span more than [`MAX_CELLS_PER_ZONE`] cells
//! (continent-sized catch-alls) are kept in a separate list that every query
//! checks, so a handful of huge zones cannot blow up the cell map.
//!
//! # Immutability
//!
//! A `SpatialIndex` is never modified after [`SpatialIndex::build`]. A refresh
//! builds a new index and publishes it through
//! [`SnapshotCell`](super::SnapshotCell).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::containment::zone_contains;
use super::region::GridCell;
use crate::coord::Coordinate;
use crate::zone::{Zone, ZoneId, ZoneSet};

/// Default grid cell edge in degrees (~55 km of latitude).
pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.5;

/// Smallest accepted cell edge in degrees.
pub const MIN_CELL_SIZE_DEG: f64 = 0.01;

/// Largest accepted cell edge in degrees.
pub const MAX_CELL_SIZE_DEG: f64 = 10.0;

/// Zones spanning more cells than this go to the always-checked list.
pub const MAX_CELLS_PER_ZONE: u64 = 4096;

/// Spatial index tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexConfig {
    /// Grid cell edge in degrees.
    pub cell_size_deg: f64,
}

impl IndexConfig {
    pub fn new(cell_size_deg: f64) -> Self {
        Self { cell_size_deg }
    }

    /// Cell size clamped to the accepted range; non-finite values fall back
    /// to the default.
    pub fn effective_cell_size(&self) -> f64 {
        if self.cell_size_deg.is_finite() {
            self.cell_size_deg.clamp(MIN_CELL_SIZE_DEG, MAX_CELL_SIZE_DEG)
        } else {
            DEFAULT_CELL_SIZE_DEG
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cell_size_deg: DEFAULT_CELL_SIZE_DEG,
        }
    }
}

/// Order two zones by resolution preference.
///
/// `Ordering::Less` means `a` wins: higher priority first, then the lower
/// identifier.
pub fn preference(a: &Zone, b: &Zone) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| a.id().cmp(b.id()))
}

/// Immutable grid index over the active zones of one [`ZoneSet`].
pub struct SpatialIndex {
    zones: Arc<ZoneSet>,
    cell_size: f64,
    cells: HashMap<GridCell, Vec<usize>>,
    oversized: Vec<usize>,
    indexed: usize,
}

impl SpatialIndex {
    /// Build an index over the active zones of `zones`.
    ///
    /// Inactive zones stay in the set but are never returned by a query.
    pub fn build(zones: Arc<ZoneSet>, config: &IndexConfig) -> Self {
        let started = Instant::now();
        let cell_size = config.effective_cell_size();
        let mut cells: HashMap<GridCell, Vec<usize>> = HashMap::new();
        let mut oversized = Vec::new();
        let mut indexed = 0;

        for (position, zone) in zones.zones().iter().enumerate() {
            if !zone.is_active() {
                continue;
            }
            indexed += 1;

            if GridCell::span(zone.bbox(), cell_size) > MAX_CELLS_PER_ZONE {
                oversized.push(position);
                continue;
            }
            for cell in GridCell::covering(zone.bbox(), cell_size) {
                cells.entry(cell).or_default().push(position);
            }
        }

        debug!(
            zone_count = indexed,
            cell_count = cells.len(),
            oversized = oversized.len(),
            cell_size_deg = cell_size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Spatial index built"
        );

        Self {
            zones,
            cell_size,
            cells,
            oversized,
            indexed,
        }
    }

    /// Bounding-box phase: zones whose bounding box contains the point.
    ///
    /// Candidates may not actually contain the point; use
    /// [`containing`](Self::containing) for the exact answer.
    pub fn query(&self, coord: &Coordinate) -> Vec<&Zone> {
        let cell = GridCell::containing(coord, self.cell_size);
        let in_cell = self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[]);

        in_cell
            .iter()
            .chain(self.oversized.iter())
            .map(|&position| &self.zones.zones()[position])
            .filter(|zone| zone.bbox().contains(coord))
            .collect()
    }

    /// Identifiers of the bounding-box candidates for a point.
    pub fn candidates(&self, coord: &Coordinate) -> Vec<ZoneId> {
        self.query(coord)
            .into_iter()
            .map(|zone| zone.id().clone())
            .collect()
    }

    /// Zones that contain the point, in resolution preference order.
    pub fn containing(&self, coord: &Coordinate) -> Vec<&Zone> {
        let mut zones: Vec<&Zone> = self
            .query(coord)
            .into_iter()
            .filter(|zone| zone_contains(zone, coord))
            .collect();
        zones.sort_by(|a, b| preference(a, b));
        zones
    }

    /// The zone a point resolves to, if any.
    ///
    /// Highest priority wins; equal priorities go to the lowest identifier.
    pub fn best_match(&self, coord: &Coordinate) -> Option<&Zone> {
        self.query(coord)
            .into_iter()
            .filter(|zone| zone_contains(zone, coord))
            .min_by(|a, b| preference(a, b))
    }

    /// The zone set this index was built from.
    pub fn zones(&self) -> &Arc<ZoneSet> {
        &self.zones
    }

    /// Number of active zones in the index.
    pub fn zone_count(&self) -> usize {
        self.indexed
    }

    /// Number of populated grid cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of zones too large for the grid.
    pub fn oversized_count(&self) -> usize {
        self.oversized.len()
    }

    /// Grid cell edge actually used, in degrees.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("zones", &self.indexed)
            .field("cells", &self.cells.len())
            .field("oversized", &self.oversized.len())
            .field("cell_size", &self.cell_size)
            .finish()
    }
}
