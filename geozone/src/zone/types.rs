//! Zone and zone identifier types.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::ring::Ring;
use crate::coord::BoundingBox;

/// Unique zone identifier.
///
/// Cheap to clone; resolution results and cache entries share the same
/// allocation. Ordering is byte-wise on the identifier string, which is what
/// the lowest-identifier tie-break relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(Arc<str>);

impl ZoneId {
    /// Create a zone identifier.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Borrow<str> for ZoneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for ZoneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Errors raised when a zone is assembled from invalid parts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    /// Identifier is empty or whitespace.
    #[error("zone identifier is empty")]
    EmptyId,

    /// No outer boundary was supplied.
    #[error("zone '{0}' has no boundary rings")]
    NoRings(String),
}

/// A delivery zone.
///
/// The first ring is the outer boundary; each following ring is a hole.
/// A point is in the zone when it is inside the outer ring and outside every
/// hole.
#[derive(Debug, Clone)]
pub struct Zone {
    id: ZoneId,
    name: Option<String>,
    rings: Vec<Ring>,
    priority: i32,
    active: bool,
    version: u64,
    bbox: BoundingBox,
}

impl Zone {
    /// Create an active zone at version 0.
    pub fn new(id: impl AsRef<str>, rings: Vec<Ring>, priority: i32) -> Result<Self, ZoneError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(ZoneError::EmptyId);
        }
        let bbox = match rings.first() {
            Some(outer) => *outer.bbox(),
            None => return Err(ZoneError::NoRings(id.to_string())),
        };

        Ok(Self {
            id: ZoneId::new(id),
            name: None,
            rings,
            priority,
            active: true,
            version: 0,
            bbox,
        })
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the source version of this zone definition.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Outer ring followed by inner rings.
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// The outer boundary ring.
    pub fn outer(&self) -> &Ring {
        &self.rings[0]
    }

    /// Inner (exclusion) rings.
    pub fn holes(&self) -> &[Ring] {
        &self.rings[1..]
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bounding box of the outer ring.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;

    fn square(min: f64, max: f64) -> Ring {
        let c = |lat, lon| Coordinate::new(lat, lon).unwrap();
        Ring::new(vec![c(min, min), c(min, max), c(max, max), c(max, min)]).unwrap()
    }

    #[test]
    fn test_zone_defaults() {
        let zone = Zone::new("north", vec![square(0.0, 10.0)], 3).unwrap();
        assert_eq!(zone.id().as_str(), "north");
        assert_eq!(zone.priority(), 3);
        assert!(zone.is_active());
        assert_eq!(zone.version(), 0);
        assert!(zone.name().is_none());
        assert!(zone.holes().is_empty());
    }

    #[test]
    fn test_zone_builder_methods() {
        let zone = Zone::new("north", vec![square(0.0, 10.0), square(2.0, 4.0)], 1)
            .unwrap()
            .with_name("North Hub")
            .with_active(false)
            .with_version(7);
        assert_eq!(zone.name(), Some("North Hub"));
        assert!(!zone.is_active());
        assert_eq!(zone.version(), 7);
        assert_eq!(zone.holes().len(), 1);
    }

    #[test]
    fn test_zone_bbox_follows_outer_ring() {
        let zone = Zone::new("z", vec![square(1.0, 5.0)], 0).unwrap();
        assert_eq!(zone.bbox().min_lat, 1.0);
        assert_eq!(zone.bbox().max_lon, 5.0);
    }

    #[test]
    fn test_identifier_is_trimmed() {
        let zone = Zone::new("  east ", vec![square(0.0, 1.0)], 0).unwrap();
        assert_eq!(zone.id().as_str(), "east");
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let result = Zone::new("   ", vec![square(0.0, 1.0)], 0);
        assert!(matches!(result, Err(ZoneError::EmptyId)));
    }

    #[test]
    fn test_no_rings_rejected() {
        let result = Zone::new("z", Vec::new(), 0);
        assert_eq!(result.unwrap_err(), ZoneError::NoRings("z".to_string()));
    }

    #[test]
    fn test_zone_id_ordering_is_bytewise() {
        let mut ids = vec![ZoneId::new("b"), ZoneId::new("B"), ZoneId::new("a")];
        ids.sort();
        let ordered: Vec<_> = ids.iter().map(ZoneId::as_str).collect();
        assert_eq!(ordered, vec!["B", "a", "b"]);
    }

    #[test]
    fn test_zone_id_serializes_as_string() {
        let json = serde_json::to_string(&ZoneId::new("A-1")).unwrap();
        assert_eq!(json, "\"A-1\"");
    }
}
