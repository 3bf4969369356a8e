//! Serviceability service and zone refresh.
//!
//! This module wires the resolver, cache and repository into the public
//! query API and keeps the zone snapshot fresh in the background.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use geozone::repository::FileZoneRepository;
//! use geozone::service::{ServiceConfig, ServiceStack};
//! use geozone::telemetry::ServiceMetrics;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let stack = ServiceStack::new(
//!     FileZoneRepository::new("zones.json"),
//!     &ServiceConfig::default(),
//!     ServiceMetrics::global(),
//! );
//! stack.load().await?;
//!
//! let answer = stack.service().check_serviceability(40.7128, -74.0060)?;
//! println!("serviceable: {}", answer.serviceable);
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod daemon;
mod error;
mod facade;
mod refresh;

pub use builder::{create_cache, create_resolver, ServiceStack};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use daemon::RefreshDaemon;
pub use error::ServiceError;
pub use facade::{Serviceability, ServiceabilityService};
pub use refresh::{RefreshConfig, RefreshError, RefreshReport, ZoneRefresher};
