//! Point-in-time metrics snapshot.
//!
//! Provides an immutable view of metrics for display and reporting.

use std::fmt;
use std::time::Duration;

/// A point-in-time snapshot of serviceability metrics.
///
/// All derived values (hit rate, average latency) are computed when the
/// snapshot is taken.
#[derive(Clone, Debug)]
pub struct MetricsSnapshot {
    /// How long metrics have been collected
    pub uptime: Duration,

    // === Cache metrics ===
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Cache hit rate (0.0 - 1.0)
    pub cache_hit_rate: f64,

    // === Resolution metrics ===
    /// Spatial queries issued to the resolver
    pub resolver_calls: u64,
    pub serviceable: u64,
    pub unserviceable: u64,
    /// Checks answered with "temporarily unavailable"
    pub unavailable: u64,
    /// Checks rejected for an invalid coordinate
    pub invalid: u64,

    // === Timing metrics ===
    pub latency_avg_us: f64,
    pub latency_min_us: u64,
    pub latency_max_us: u64,

    // === Refresh metrics ===
    pub refreshes_succeeded: u64,
    pub refreshes_failed: u64,
}

impl MetricsSnapshot {
    /// Total checks that produced an answer or an unavailable signal.
    pub fn total_checks(&self) -> u64 {
        self.serviceable + self.unserviceable + self.unavailable
    }

    /// Returns uptime in human-readable format.
    pub fn uptime_human(&self) -> String {
        format_duration(self.uptime)
    }
}

/// Format a duration as `1h 02m 03s`, `2m 03s` or `3s`.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Serviceability Metrics (uptime: {})", self.uptime_human())?;
        writeln!(f, "─────────────────────────────────────────")?;
        writeln!(f)?;

        writeln!(f, "Checks:")?;
        writeln!(f, "  Serviceable: {}", self.serviceable)?;
        writeln!(f, "  Unserviceable: {}", self.unserviceable)?;
        writeln!(f, "  Unavailable: {}", self.unavailable)?;
        writeln!(f, "  Invalid: {}", self.invalid)?;
        writeln!(f)?;

        writeln!(f, "Cache:")?;
        writeln!(
            f,
            "  Hits: {} / Misses: {} ({:.1}% hit rate)",
            self.cache_hits,
            self.cache_misses,
            self.cache_hit_rate * 100.0
        )?;
        writeln!(f, "  Resolver calls: {}", self.resolver_calls)?;
        writeln!(f)?;

        writeln!(f, "Latency:")?;
        writeln!(
            f,
            "  avg {:.1}µs / min {}µs / max {}µs",
            self.latency_avg_us, self.latency_min_us, self.latency_max_us
        )?;
        writeln!(f)?;

        writeln!(f, "Refreshes:")?;
        write!(
            f,
            "  Succeeded: {} / Failed: {}",
            self.refreshes_succeeded, self.refreshes_failed
        )
    }
}
