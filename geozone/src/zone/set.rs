//! Immutable zone snapshot.

use std::collections::HashMap;
use std::time::SystemTime;

use thiserror::Error;

use super::types::{Zone, ZoneId};

/// Errors raised when assembling a [`ZoneSet`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneSetError {
    /// Two zones share an identifier.
    #[error("duplicate zone identifier '{0}'")]
    DuplicateId(String),
}

/// The full collection of zones known at a point in time.
///
/// A `ZoneSet` is never mutated after construction. Refreshing zone data
/// builds a new set, so anything holding a reference to an older set keeps a
/// consistent view.
#[derive(Debug, Clone)]
pub struct ZoneSet {
    zones: Vec<Zone>,
    by_id: HashMap<ZoneId, usize>,
    loaded_at: SystemTime,
}

impl ZoneSet {
    /// Build a snapshot from zones, rejecting duplicate identifiers.
    pub fn new(zones: Vec<Zone>) -> Result<Self, ZoneSetError> {
        let mut by_id = HashMap::with_capacity(zones.len());
        for (position, zone) in zones.iter().enumerate() {
            if by_id.insert(zone.id().clone(), position).is_some() {
                return Err(ZoneSetError::DuplicateId(zone.id().to_string()));
            }
        }

        Ok(Self {
            zones,
            by_id,
            loaded_at: SystemTime::now(),
        })
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self {
            zones: Vec::new(),
            by_id: HashMap::new(),
            loaded_at: SystemTime::now(),
        }
    }

    /// All zones, active and inactive, in source order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Iterate active zones only.
    pub fn active(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|zone| zone.is_active())
    }

    /// Look up a zone by identifier.
    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.by_id.get(id).map(|&position| &self.zones[position])
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Version label of the snapshot: the highest zone version (0 when empty).
    pub fn version(&self) -> u64 {
        self.zones.iter().map(Zone::version).max().unwrap_or(0)
    }

    /// When this snapshot was assembled.
    pub fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }
}
