//! Coordinate quantization for cache keys.

use std::fmt;

use crate::coord::Coordinate;

/// A coordinate snapped down to a fixed decimal grid.
///
/// With precision `p`, each axis is stored as `floor(value * 10^p)`, so every
/// point in the half-open square `[k, k + 10^-p)` on both axes shares a key.
/// Precision 3 gives buckets of about 110 m of latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    lat: i64,
    lon: i64,
}

impl BucketKey {
    /// Quantize a coordinate at the given number of decimal places.
    pub fn new(coord: &Coordinate, precision: u8) -> Self {
        let scale = 10f64.powi(i32::from(precision));
        Self {
            lat: (coord.lat() * scale).floor() as i64,
            lon: (coord.lon() * scale).floor() as i64,
        }
    }

    /// Quantized latitude.
    pub fn lat(&self) -> i64 {
        self.lat
    }

    /// Quantized longitude.
    pub fn lon(&self) -> i64 {
        self.lon
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lat, self.lon)
    }
}
