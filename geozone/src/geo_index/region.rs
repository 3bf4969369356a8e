//! Grid cell coordinate type.
//!
//! A [`GridCell`] is one square of the uniform grid laid over the globe. Rows
//! count northward from the south pole and columns eastward from the
//! antimeridian, so both are non-negative.

use std::fmt;

use crate::coord::{BoundingBox, Coordinate};

/// One cell of the spatial grid.
///
/// # Examples
///
/// ```
/// use geozone::coord::Coordinate;
/// use geozone::geo_index::GridCell;
///
/// let coord = Coordinate::new(0.2, 0.7).unwrap();
/// let cell = GridCell::containing(&coord, 0.5);
/// assert_eq!(cell, GridCell::new(180, 361));
/// assert_eq!(format!("{}", cell), "R0180C0361");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    /// Row index, 0 at the south pole.
    pub row: u32,
    /// Column index, 0 at longitude -180.
    pub col: u32,
}

impl GridCell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// The cell containing a coordinate.
    ///
    /// Cells are half-open on their north and east sides. The north pole and
    /// the +180 meridian fold into the last row and column.
    pub fn containing(coord: &Coordinate, cell_size: f64) -> Self {
        Self {
            row: axis_index(coord.lat() + 90.0, cell_size, row_count(cell_size)),
            col: axis_index(coord.lon() + 180.0, cell_size, col_count(cell_size)),
        }
    }

    /// Every cell overlapped by a bounding box, row-major.
    pub fn covering(bbox: &BoundingBox, cell_size: f64) -> impl Iterator<Item = GridCell> {
        let rows = row_count(cell_size);
        let cols = col_count(cell_size);
        let row_min = axis_index(bbox.min_lat + 90.0, cell_size, rows);
        let row_max = axis_index(bbox.max_lat + 90.0, cell_size, rows);
        let col_min = axis_index(bbox.min_lon + 180.0, cell_size, cols);
        let col_max = axis_index(bbox.max_lon + 180.0, cell_size, cols);

        (row_min..=row_max).flat_map(move |row| (col_min..=col_max).map(move |col| Self { row, col }))
    }

    /// Number of cells a bounding box spans, without enumerating them.
    pub fn span(bbox: &BoundingBox, cell_size: f64) -> u64 {
        let rows = row_count(cell_size);
        let cols = col_count(cell_size);
        let row_span = axis_index(bbox.max_lat + 90.0, cell_size, rows)
            - axis_index(bbox.min_lat + 90.0, cell_size, rows)
            + 1;
        let col_span = axis_index(bbox.max_lon + 180.0, cell_size, cols)
            - axis_index(bbox.min_lon + 180.0, cell_size, cols)
            + 1;
        u64::from(row_span) * u64::from(col_span)
    }
}

fn row_count(cell_size: f64) -> u32 {
    (180.0 / cell_size).ceil() as u32
}

fn col_count(cell_size: f64) -> u32 {
    (360.0 / cell_size).ceil() as u32
}

/// Offset along an axis (already shifted to start at 0) to a clamped index.
fn axis_index(offset: f64, cell_size: f64, count: u32) -> u32 {
    let index = (offset / cell_size).floor();
    if index <= 0.0 {
        0
    } else {
        (index as u32).min(count.saturating_sub(1))
    }
}

impl fmt::Display for GridCell {
    /// Format as `R<row>C<col>` (e.g., `R0180C0361`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{:04}C{:04}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_containing_origin() {
        let cell = GridCell::containing(&c(0.0, 0.0), 1.0);
        assert_eq!(cell, GridCell::new(90, 180));
    }

    #[test]
    fn test_containing_negative() {
        let cell = GridCell::containing(&c(-33.9, -118.4), 1.0);
        assert_eq!(cell, GridCell::new(56, 61));
    }

    #[test]
    fn test_containing_fractional_cell_size() {
        let cell = GridCell::containing(&c(0.2, 0.7), 0.5);
        assert_eq!(cell, GridCell::new(180, 361));
    }

    #[test]
    fn test_containing_poles_and_antimeridian() {
        assert_eq!(GridCell::containing(&c(-90.0, -180.0), 1.0), GridCell::new(0, 0));
        assert_eq!(GridCell::containing(&c(90.0, 180.0), 1.0), GridCell::new(179, 359));
    }

    #[test]
    fn test_cell_boundary_belongs_to_north_east_cell() {
        let cell = GridCell::containing(&c(1.0, 1.0), 1.0);
        assert_eq!(cell, GridCell::new(91, 181));
    }

    #[test]
    fn test_covering_single_cell() {
        let bbox = BoundingBox {
            min_lat: 0.1,
            min_lon: 0.1,
            max_lat: 0.4,
            max_lon: 0.4,
        };
        let cells: Vec<_> = GridCell::covering(&bbox, 1.0).collect();
        assert_eq!(cells, vec![GridCell::new(90, 180)]);
        assert_eq!(GridCell::span(&bbox, 1.0), 1);
    }

    #[test]
    fn test_covering_block() {
        let bbox = BoundingBox {
            min_lat: 0.0,
            min_lon: 0.0,
            max_lat: 10.0,
            max_lon: 10.0,
        };
        let cells: Vec<_> = GridCell::covering(&bbox, 5.0).collect();
        // Rows 18..=20, cols 36..=38
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&GridCell::new(18, 36)));
        assert_eq!(cells.last(), Some(&GridCell::new(20, 38)));
        assert_eq!(GridCell::span(&bbox, 5.0), 9);
    }

    #[test]
    fn test_covering_contains_cell_of_every_inner_point() {
        let bbox = BoundingBox {
            min_lat: -3.2,
            min_lon: 7.9,
            max_lat: 1.1,
            max_lon: 9.6,
        };
        let cells: Vec<_> = GridCell::covering(&bbox, 0.5).collect();
        for point in [c(-3.2, 7.9), c(1.1, 9.6), c(0.0, 8.5), c(-1.75, 9.0)] {
            assert!(cells.contains(&GridCell::containing(&point, 0.5)));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", GridCell::new(7, 42)), "R0007C0042");
    }

    #[test]
    fn test_hash_consistency() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(GridCell::new(43, 6));
        set.insert(GridCell::new(43, 6));
        set.insert(GridCell::new(44, 7));
        assert_eq!(set.len(), 2);
    }
}
