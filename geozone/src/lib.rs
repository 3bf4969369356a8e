//! GeoZone - Geographic service-zone resolution
//!
//! This library answers whether a latitude/longitude point lies inside a
//! service zone and, if so, which one. Zones are polygons (with optional
//! holes) loaded from a repository, indexed on a uniform grid and published
//! as immutable snapshots that queries read without blocking refreshes.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use geozone::repository::FileZoneRepository;
//! use geozone::service::{ServiceConfig, ServiceStack};
//! use geozone::telemetry::ServiceMetrics;
//!
//! let stack = ServiceStack::new(
//!     FileZoneRepository::new("zones.json"),
//!     &ServiceConfig::default(),
//!     ServiceMetrics::global(),
//! );
//! stack.load().await?;
//!
//! let answer = stack.service().check_serviceability(40.7128, -74.0060)?;
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod geo_index;
pub mod logging;
pub mod repository;
pub mod resolver;
pub mod service;
pub mod telemetry;
pub mod zone;

/// Version of the GeoZone library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
