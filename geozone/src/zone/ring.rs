//! Polygon rings and load-time geometry validation.
//!
//! Rings are stored open: the closing edge from the last vertex back to the
//! first is implied. Longitude is treated as the x axis and latitude as the
//! y axis for all planar computations.

use thiserror::Error;

use crate::coord::{BoundingBox, Coordinate};

/// Minimum number of distinct vertices in a ring.
pub const MIN_RING_VERTICES: usize = 3;

/// Errors raised when a ring is not a simple polygon.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RingError {
    /// Fewer than three distinct vertices after normalization.
    #[error("ring has {0} distinct vertices (need at least {min})", min = MIN_RING_VERTICES)]
    TooFewVertices(usize),

    /// All vertices are collinear.
    #[error("ring encloses zero area")]
    ZeroArea,

    /// Two edges cross or overlap.
    #[error("ring self-intersects between edge {first} and edge {second}")]
    SelfIntersecting { first: usize, second: usize },
}

/// A closed, simple polygon ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    vertices: Vec<Coordinate>,
    bbox: BoundingBox,
}

impl Ring {
    /// Build a ring from its vertices.
    ///
    /// Consecutive duplicate vertices are collapsed and an explicit closing
    /// vertex (last equal to first) is dropped before validation.
    ///
    /// Validation is quadratic in the vertex count, which is fine at load
    /// time for delivery-zone sized polygons.
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self, RingError> {
        let vertices = normalize(vertices);
        if vertices.len() < MIN_RING_VERTICES {
            return Err(RingError::TooFewVertices(vertices.len()));
        }
        if signed_area(&vertices) == 0.0 {
            return Err(RingError::ZeroArea);
        }
        if let Some((first, second)) = find_self_intersection(&vertices) {
            return Err(RingError::SelfIntersecting { first, second });
        }

        // Non-empty: checked above
        let bbox = match BoundingBox::from_points(&vertices) {
            Some(bbox) => bbox,
            None => return Err(RingError::TooFewVertices(0)),
        };

        Ok(Self { vertices, bbox })
    }

    /// Vertices in order, without the implied closing vertex.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Bounding box of the ring.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Absolute enclosed area in square degrees.
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    /// Iterate edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Coordinate, &Coordinate)> {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }
}

fn normalize(mut vertices: Vec<Coordinate>) -> Vec<Coordinate> {
    vertices.dedup();
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

/// Shoelace formula; positive for counter-clockwise rings.
fn signed_area(vertices: &[Coordinate]) -> f64 {
    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = &vertices[i];
            let b = &vertices[(i + 1) % n];
            a.lon() * b.lat() - b.lon() * a.lat()
        })
        .sum();
    twice / 2.0
}

/// Cross product of `pq` and `pr`: >0 left turn, <0 right turn, 0 collinear.
fn orientation(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> f64 {
    (q.lon() - p.lon()) * (r.lat() - p.lat()) - (q.lat() - p.lat()) * (r.lon() - p.lon())
}

/// Whether `r` lies within the box spanned by `p` and `q` (assumes collinear).
fn within_span(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> bool {
    r.lon() >= p.lon().min(q.lon())
        && r.lon() <= p.lon().max(q.lon())
        && r.lat() >= p.lat().min(q.lat())
        && r.lat() <= p.lat().max(q.lat())
}

fn segments_intersect(p1: &Coordinate, p2: &Coordinate, q1: &Coordinate, q2: &Coordinate) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    let straddles_q = (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0);
    let straddles_p = (d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0);
    if straddles_q && straddles_p {
        return true;
    }

    (d1 == 0.0 && within_span(q1, q2, p1))
        || (d2 == 0.0 && within_span(q1, q2, p2))
        || (d3 == 0.0 && within_span(p1, p2, q1))
        || (d4 == 0.0 && within_span(p1, p2, q2))
}

/// Adjacent edges `a→b` and `b→c` fold back onto each other.
fn folds_back(a: &Coordinate, b: &Coordinate, c: &Coordinate) -> bool {
    if orientation(a, b, c) != 0.0 {
        return false;
    }
    let dot = (a.lon() - b.lon()) * (c.lon() - b.lon()) + (a.lat() - b.lat()) * (c.lat() - b.lat());
    dot > 0.0
}

/// Returns the first pair of intersecting edges, by edge index.
///
/// Edge `i` runs from vertex `i` to vertex `i + 1` (wrapping).
fn find_self_intersection(vertices: &[Coordinate]) -> Option<(usize, usize)> {
    let n = vertices.len();
    let at = |i: usize| &vertices[i % n];

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                // Shared vertex is the end of the earlier edge in ring order
                let (a, b, c) = if j == i + 1 {
                    (at(i), at(i + 1), at(i + 2))
                } else {
                    (at(n - 1), at(0), at(1))
                };
                if folds_back(a, b, c) {
                    return Some((i, j));
                }
            } else if segments_intersect(at(i), at(i + 1), at(j), at(j + 1)) {
                return Some((i, j));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn square() -> Vec<Coordinate> {
        vec![c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0)]
    }

    #[test]
    fn test_valid_square() {
        let ring = Ring::new(square()).unwrap();
        assert_eq!(ring.vertices().len(), 4);
        assert_eq!(ring.area(), 100.0);
        assert_eq!(ring.bbox().max_lat, 10.0);
    }

    #[test]
    fn test_explicit_closing_vertex_is_dropped() {
        let mut vertices = square();
        vertices.push(c(0.0, 0.0));
        let ring = Ring::new(vertices).unwrap();
        assert_eq!(ring.vertices().len(), 4);
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let vertices = vec![
            c(0.0, 0.0),
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
        ];
        let ring = Ring::new(vertices).unwrap();
        assert_eq!(ring.vertices().len(), 4);
    }

    #[test]
    fn test_too_few_vertices() {
        let result = Ring::new(vec![c(0.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)]);
        assert_eq!(result, Err(RingError::TooFewVertices(2)));
    }

    #[test]
    fn test_collinear_ring_has_zero_area() {
        let result = Ring::new(vec![c(0.0, 0.0), c(1.0, 1.0), c(2.0, 2.0)]);
        assert_eq!(result, Err(RingError::ZeroArea));
    }

    #[test]
    fn test_bowtie_is_rejected() {
        // First and third edges cross
        let result = Ring::new(vec![c(0.0, 0.0), c(10.0, 10.0), c(10.0, 0.0), c(0.0, 4.0)]);
        assert!(matches!(result, Err(RingError::SelfIntersecting { .. })));
    }

    #[test]
    fn test_touching_vertex_is_rejected() {
        // Vertex (5,5) is visited twice, pinching the ring into a figure-eight
        let result = Ring::new(vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(5.0, 5.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
            c(5.0, 5.0),
        ]);
        assert!(matches!(result, Err(RingError::SelfIntersecting { .. })));
    }

    #[test]
    fn test_spike_is_rejected() {
        // Goes out to (5,15) and straight back along the same line
        let result = Ring::new(vec![
            c(0.0, 0.0),
            c(0.0, 10.0),
            c(5.0, 10.0),
            c(5.0, 15.0),
            c(5.0, 10.0),
            c(10.0, 10.0),
            c(10.0, 0.0),
        ]);
        assert!(matches!(result, Err(RingError::SelfIntersecting { .. })));
    }

    #[test]
    fn test_concave_ring_is_accepted() {
        // U-shape opening north
        let ring = Ring::new(vec![
            c(0.0, 0.0),
            c(0.0, 9.0),
            c(9.0, 9.0),
            c(9.0, 6.0),
            c(3.0, 6.0),
            c(3.0, 3.0),
            c(9.0, 3.0),
            c(9.0, 0.0),
        ]);
        assert!(ring.is_ok());
    }

    #[test]
    fn test_edges_include_closing_edge() {
        let ring = Ring::new(square()).unwrap();
        let edges: Vec<_> = ring.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(*edges[3].0, c(10.0, 0.0));
        assert_eq!(*edges[3].1, c(0.0, 0.0));
    }
}
