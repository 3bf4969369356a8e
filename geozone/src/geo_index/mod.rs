//! Spatial index for zone lookup.
//!
//! The [`SpatialIndex`] partitions the globe into a uniform grid of
//! [`GridCell`]s and registers each active zone in every cell its bounding box
//! overlaps. Lookups run in two phases: a bounding-box phase over the zones in
//! the point's cell, then an exact point-in-polygon test on the survivors.
//!
//! # Architecture
//!
//! ```text
//! SnapshotCell
//! └── Arc<IndexSnapshot> (generation N)
//!     └── SpatialIndex
//!         ├── R0180C0360 → [A, B]
//!         ├── R0180C0361 → [A]
//!         └── oversized  → [world]
//! ```
//!
//! # Thread Safety
//!
//! - A built `SpatialIndex` is immutable and shared through `Arc`
//! - [`SnapshotCell`] swaps the published `Arc` under a brief `RwLock` write
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use geozone::coord::Coordinate;
//! use geozone::geo_index::{IndexConfig, SpatialIndex};
//! use geozone::zone::{Ring, Zone, ZoneSet};
//!
//! let c = |lat, lon| Coordinate::new(lat, lon).unwrap();
//! let ring = Ring::new(vec![c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0)]).unwrap();
//! let zones = ZoneSet::new(vec![Zone::new("A", vec![ring], 1).unwrap()]).unwrap();
//!
//! let index = SpatialIndex::build(Arc::new(zones), &IndexConfig::default());
//! assert_eq!(index.best_match(&c(5.0, 5.0)).unwrap().id().as_str(), "A");
//! assert!(index.best_match(&c(15.0, 15.0)).is_none());
//! ```

mod containment;
mod index;
mod region;
mod snapshot;

pub use containment::{ring_contains, zone_contains};
pub use index::{
    preference, IndexConfig, SpatialIndex, DEFAULT_CELL_SIZE_DEG, MAX_CELLS_PER_ZONE,
    MAX_CELL_SIZE_DEG, MIN_CELL_SIZE_DEG,
};
pub use region::GridCell;
pub use snapshot::{IndexSnapshot, SnapshotCell};
