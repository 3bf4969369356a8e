//! Service error types.

use thiserror::Error;

use crate::coord::CoordError;

/// Errors returned by a serviceability check.
///
/// A coordinate outside every zone is not an error; it is answered with
/// `serviceable: false`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// No zone data has been loaded yet. Callers may retry.
    #[error("serviceability temporarily unavailable: zone data not loaded")]
    TemporarilyUnavailable,

    /// The latitude or longitude is out of range or not finite.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordError),
}

impl ServiceError {
    /// Whether the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TemporarilyUnavailable)
    }
}
