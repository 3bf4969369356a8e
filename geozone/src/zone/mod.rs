//! Delivery zone model.
//!
//! A [`Zone`] is a named polygon with optional holes, a priority used to break
//! ties between overlapping zones, and an active flag. Zones are grouped into
//! an immutable [`ZoneSet`] snapshot; a refresh always produces a new set
//! rather than editing zones in place.
//!
//! Geometry is validated when a zone is constructed. A [`Ring`] that is not a
//! simple polygon never reaches the spatial index.
//!
//! # Example
//!
//! ```
//! use geozone::coord::Coordinate;
//! use geozone::zone::{Ring, Zone, ZoneSet};
//!
//! let square = Ring::new(vec![
//!     Coordinate::new(0.0, 0.0).unwrap(),
//!     Coordinate::new(0.0, 10.0).unwrap(),
//!     Coordinate::new(10.0, 10.0).unwrap(),
//!     Coordinate::new(10.0, 0.0).unwrap(),
//! ])
//! .unwrap();
//!
//! let zone = Zone::new("A", vec![square], 1).unwrap();
//! let set = ZoneSet::new(vec![zone]).unwrap();
//! assert_eq!(set.active_count(), 1);
//! ```

mod ring;
mod set;
mod types;

pub use ring::{Ring, RingError};
pub use set::{ZoneSet, ZoneSetError};
pub use types::{Zone, ZoneError, ZoneId};
