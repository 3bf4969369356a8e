//! Repository error types.

use thiserror::Error;

use crate::coord::CoordError;
use crate::zone::{RingError, ZoneError};

/// Errors from loading zone definitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    /// The store could not be reached (I/O, HTTP, timeout).
    #[error("zone source unavailable: {0}")]
    Unavailable(String),

    /// The payload could not be parsed, or no valid active zone remained.
    #[error("malformed zone data: {0}")]
    MalformedData(String),
}

/// Why a single zone record was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// The record is not a valid zone object.
    #[error("invalid record: {0}")]
    Shape(String),

    /// A vertex is outside the valid coordinate range.
    #[error("ring {ring} vertex {vertex}: {source}")]
    Coordinate {
        ring: usize,
        vertex: usize,
        source: CoordError,
    },

    /// A ring is not a simple polygon.
    #[error("ring {ring}: {source}")]
    Ring { ring: usize, source: RingError },

    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// Another record already used this identifier.
    #[error("duplicate zone identifier '{0}'")]
    DuplicateId(String),
}
