//! Exact point-in-polygon testing.
//!
//! Uses the crossing-number rule with a ray cast toward +longitude. An edge
//! counts as crossed when its endpoints lie on opposite sides of the point's
//! latitude, with the lower endpoint counted as "below" and the upper as
//! "above". This gives a half-open convention:
//!
//! - points on a south or west edge are inside
//! - points on a north or east edge are outside
//! - the south-west corner of an axis-aligned square is inside, the other
//!   three corners are outside
//!
//! Adjacent polygons sharing an edge therefore never both claim a point on
//! that edge.

use crate::coord::Coordinate;
use crate::zone::{Ring, Zone};

/// Whether a horizontal ray from `coord` crosses the ring an odd number of times.
pub fn ring_contains(ring: &Ring, coord: &Coordinate) -> bool {
    let x = coord.lon();
    let y = coord.lat();
    let mut inside = false;

    for (a, b) in ring.edges() {
        if (a.lat() > y) != (b.lat() > y) {
            let x_cross = a.lon() + (y - a.lat()) * (b.lon() - a.lon()) / (b.lat() - a.lat());
            if x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether a zone contains a coordinate.
///
/// The point must lie inside the outer ring and outside every hole. Holes
/// that overlap each other or stick out past the outer ring only ever
/// remove area.
pub fn zone_contains(zone: &Zone, coord: &Coordinate) -> bool {
    if !zone.bbox().contains(coord) {
        return false;
    }
    let Some((outer, holes)) = zone.rings().split_first() else {
        return false;
    };
    ring_contains(outer, coord) && !holes.iter().any(|hole| ring_contains(hole, coord))
}
