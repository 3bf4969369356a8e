//! Zone record wire format and conversion into validated zones.
//!
//! The source returns a JSON array of records:
//!
//! ```json
//! [
//!   { "id": "A", "name": "Downtown", "priority": 1, "active": true, "version": 3,
//!     "rings": [[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]] }
//! ]
//! ```
//!
//! Each vertex is a `[latitude, longitude]` pair. `name` and `version` are
//! optional and `active` defaults to true. A `{"zones": [...]}` wrapper object
//! is accepted as well.
//!
//! Records are converted one at a time. A bad record is skipped with a
//! warning instead of failing the load; only a payload that cannot be parsed
//! at all, or one with no valid active zone left, is an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::{RecordError, RepositoryError};
use crate::coord::Coordinate;
use crate::zone::{Ring, Zone, ZoneSet};

fn default_active() -> bool {
    true
}

/// One zone as delivered by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub version: u64,
    /// Outer ring first, then holes; vertices as `[lat, lon]`
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl ZoneRecord {
    /// An active record at version 0.
    pub fn new(id: impl Into<String>, rings: Vec<Vec<[f64; 2]>>, priority: i32) -> Self {
        Self {
            id: id.into(),
            name: None,
            priority,
            active: true,
            version: 0,
            rings,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Validate and convert into a [`Zone`].
    pub fn into_zone(self) -> Result<Zone, RecordError> {
        let mut rings = Vec::with_capacity(self.rings.len());
        for (ring_index, raw) in self.rings.iter().enumerate() {
            let vertices = raw
                .iter()
                .enumerate()
                .map(|(vertex, &[lat, lon])| {
                    Coordinate::new(lat, lon).map_err(|source| RecordError::Coordinate {
                        ring: ring_index,
                        vertex,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let ring = Ring::new(vertices).map_err(|source| RecordError::Ring {
                ring: ring_index,
                source,
            })?;
            rings.push(ring);
        }

        let mut zone = Zone::new(&self.id, rings, self.priority)?
            .with_active(self.active)
            .with_version(self.version);
        if let Some(name) = self.name {
            zone = zone.with_name(name);
        }
        Ok(zone)
    }
}

/// A record that was dropped during loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position in the payload
    pub index: usize,
    /// Identifier, when the record had a readable one
    pub id: Option<String>,
    pub reason: RecordError,
}

/// Result of converting a payload: the zone set plus what was dropped.
#[derive(Debug)]
pub struct ParsedZones {
    pub zones: ZoneSet,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<serde_json::Value>),
    Wrapped { zones: Vec<serde_json::Value> },
}

/// Parse a JSON payload into zones, skipping invalid records.
pub fn parse_zones(bytes: &[u8]) -> Result<ParsedZones, RepositoryError> {
    let payload: Payload = serde_json::from_slice(bytes)
        .map_err(|e| RepositoryError::MalformedData(e.to_string()))?;
    let values = match payload {
        Payload::List(values) | Payload::Wrapped { zones: values } => values,
    };

    let mut records = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);
        match serde_json::from_value::<ZoneRecord>(value) {
            Ok(record) => records.push((index, record)),
            Err(e) => skipped.push(SkippedRecord {
                index,
                id,
                reason: RecordError::Shape(e.to_string()),
            }),
        }
    }

    build_zones(records, skipped)
}

/// Convert already-deserialized records into zones, skipping invalid ones.
pub fn zones_from_records(records: Vec<ZoneRecord>) -> Result<ParsedZones, RepositoryError> {
    build_zones(records.into_iter().enumerate().collect(), Vec::new())
}

fn build_zones(
    records: Vec<(usize, ZoneRecord)>,
    mut skipped: Vec<SkippedRecord>,
) -> Result<ParsedZones, RepositoryError> {
    let mut seen = HashSet::new();
    let mut zones = Vec::with_capacity(records.len());

    for (index, record) in records {
        let id = record.id.trim().to_string();
        let converted = if seen.contains(&id) {
            Err(RecordError::DuplicateId(id.clone()))
        } else {
            record.into_zone()
        };
        match converted {
            Ok(zone) => {
                seen.insert(zone.id().to_string());
                zones.push(zone);
            }
            Err(reason) => skipped.push(SkippedRecord {
                index,
                id: Some(id),
                reason,
            }),
        }
    }

    skipped.sort_by_key(|s| s.index);
    for record in &skipped {
        warn!(
            index = record.index,
            id = record.id.as_deref().unwrap_or("<none>"),
            reason = %record.reason,
            "Skipping invalid zone record"
        );
    }

    let zones = ZoneSet::new(zones).map_err(|e| RepositoryError::MalformedData(e.to_string()))?;
    if zones.active_count() == 0 {
        return Err(RepositoryError::MalformedData(format!(
            "no valid active zones ({} records skipped)",
            skipped.len()
        )));
    }

    Ok(ParsedZones { zones, skipped })
}
