//! Serviceability telemetry.
//!
//! [`ServiceMetrics`] collects lock-free counters on the query path;
//! [`MetricsSnapshot`] is the immutable view used for logs and the CLI.

mod metrics;
mod snapshot;

pub use metrics::ServiceMetrics;
pub use snapshot::MetricsSnapshot;
