//! Geographic coordinate module
//!
//! Provides the validated [`Coordinate`] value type used by every other
//! component, plus the bounding box helper shared by the zone model and the
//! spatial index.

mod types;

pub use types::{BoundingBox, CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

#[cfg(test)]
mod tests;
