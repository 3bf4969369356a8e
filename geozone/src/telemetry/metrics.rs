//! Lock-free atomic metrics collection.
//!
//! Uses `AtomicU64` for thread-safe counters without locks. One process-wide
//! instance is created on first use through [`ServiceMetrics::global`];
//! components that want isolated counters (tests, embedded use) construct
//! their own with [`ServiceMetrics::new`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use super::MetricsSnapshot;

static GLOBAL: OnceLock<Arc<ServiceMetrics>> = OnceLock::new();

/// Lock-free metrics for serviceability checks.
///
/// All operations use `Relaxed` ordering; the counters are independent
/// measurements and are only ever read together through [`snapshot`](Self::snapshot).
pub struct ServiceMetrics {
    /// When metrics collection started
    start_time: Instant,

    // === Cache metrics ===
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,

    // === Resolution metrics ===
    /// Spatial queries issued to the resolver
    resolver_calls: AtomicU64,
    serviceable: AtomicU64,
    unserviceable: AtomicU64,
    /// Checks answered with "temporarily unavailable"
    unavailable: AtomicU64,
    /// Checks rejected for an invalid coordinate
    invalid: AtomicU64,

    // === Timing metrics (microseconds) ===
    latency_total_us: AtomicU64,
    latency_min_us: AtomicU64,
    latency_max_us: AtomicU64,

    // === Refresh metrics ===
    refreshes_succeeded: AtomicU64,
    refreshes_failed: AtomicU64,
}

impl ServiceMetrics {
    /// Creates a new metrics instance.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            resolver_calls: AtomicU64::new(0),
            serviceable: AtomicU64::new(0),
            unserviceable: AtomicU64::new(0),
            unavailable: AtomicU64::new(0),
            invalid: AtomicU64::new(0),
            latency_total_us: AtomicU64::new(0),
            latency_min_us: AtomicU64::new(u64::MAX),
            latency_max_us: AtomicU64::new(0),
            refreshes_succeeded: AtomicU64::new(0),
            refreshes_failed: AtomicU64::new(0),
        }
    }

    /// The process-wide instance, created on first call.
    pub fn global() -> Arc<ServiceMetrics> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ServiceMetrics::new())))
    }

    // === Cache tracking ===

    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    // === Resolution tracking ===

    /// Record a spatial query reaching the resolver.
    pub fn resolver_called(&self) {
        self.resolver_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed check and its latency.
    pub fn check_completed(&self, serviceable: bool, duration_us: u64) {
        if serviceable {
            self.serviceable.fetch_add(1, Ordering::Relaxed);
        } else {
            self.unserviceable.fetch_add(1, Ordering::Relaxed);
        }
        self.record_latency(duration_us);
    }

    /// Record a check that could not be answered because no zones are loaded.
    pub fn check_unavailable(&self, duration_us: u64) {
        self.unavailable.fetch_add(1, Ordering::Relaxed);
        self.record_latency(duration_us);
    }

    /// Record a check rejected for an invalid coordinate.
    pub fn check_invalid(&self) {
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    fn record_latency(&self, duration_us: u64) {
        self.latency_total_us
            .fetch_add(duration_us, Ordering::Relaxed);
        self.latency_min_us.fetch_min(duration_us, Ordering::Relaxed);
        self.latency_max_us.fetch_max(duration_us, Ordering::Relaxed);
    }

    // === Refresh tracking ===

    pub fn refresh_succeeded(&self) {
        self.refreshes_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn refresh_failed(&self) {
        self.refreshes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Spatial queries issued so far.
    pub fn resolver_calls(&self) -> u64 {
        self.resolver_calls.load(Ordering::Relaxed)
    }

    /// Take a point-in-time snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let serviceable = self.serviceable.load(Ordering::Relaxed);
        let unserviceable = self.unserviceable.load(Ordering::Relaxed);
        let unavailable = self.unavailable.load(Ordering::Relaxed);
        let latency_total_us = self.latency_total_us.load(Ordering::Relaxed);
        let timed = serviceable + unserviceable + unavailable;

        let latency_min_us = match self.latency_min_us.load(Ordering::Relaxed) {
            u64::MAX => 0,
            min => min,
        };

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            cache_hits,
            cache_misses,
            cache_hit_rate: ratio(cache_hits, cache_hits + cache_misses),
            resolver_calls: self.resolver_calls.load(Ordering::Relaxed),
            serviceable,
            unserviceable,
            unavailable,
            invalid: self.invalid.load(Ordering::Relaxed),
            latency_avg_us: if timed == 0 {
                0.0
            } else {
                latency_total_us as f64 / timed as f64
            },
            latency_min_us,
            latency_max_us: self.latency_max_us.load(Ordering::Relaxed),
            refreshes_succeeded: self.refreshes_succeeded.load(Ordering::Relaxed),
            refreshes_failed: self.refreshes_failed.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    ///
    /// Intended for test harnesses; production code never resets mid-process.
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.resolver_calls.store(0, Ordering::Relaxed);
        self.serviceable.store(0, Ordering::Relaxed);
        self.unserviceable.store(0, Ordering::Relaxed);
        self.unavailable.store(0, Ordering::Relaxed);
        self.invalid.store(0, Ordering::Relaxed);
        self.latency_total_us.store(0, Ordering::Relaxed);
        self.latency_min_us.store(u64::MAX, Ordering::Relaxed);
        self.latency_max_us.store(0, Ordering::Relaxed);
        self.refreshes_succeeded.store(0, Ordering::Relaxed);
        self.refreshes_failed.store(0, Ordering::Relaxed);
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_rate() {
        let metrics = ServiceMetrics::new();
        metrics.cache_hit();
        metrics.cache_hit();
        metrics.cache_hit();
        metrics.cache_miss();

        let snapshot = metrics.snapshot();
        assert!((snapshot.cache_hit_rate - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_outcomes_and_latency() {
        let metrics = ServiceMetrics::new();
        metrics.check_completed(true, 10);
        metrics.check_completed(false, 30);
        metrics.check_unavailable(5);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.serviceable, 1);
        assert_eq!(snapshot.unserviceable, 1);
        assert_eq!(snapshot.unavailable, 1);
        assert_eq!(snapshot.latency_min_us, 5);
        assert_eq!(snapshot.latency_max_us, 30);
        assert!((snapshot.latency_avg_us - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = ServiceMetrics::new().snapshot();
        assert_eq!(snapshot.latency_min_us, 0);
        assert_eq!(snapshot.latency_avg_us, 0.0);
        assert_eq!(snapshot.cache_hit_rate, 0.0);
    }

    #[test]
    fn test_reset() {
        let metrics = ServiceMetrics::new();
        metrics.resolver_called();
        metrics.check_completed(true, 100);
        metrics.refresh_failed();

        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.resolver_calls, 0);
        assert_eq!(snapshot.serviceable, 0);
        assert_eq!(snapshot.refreshes_failed, 0);
        assert_eq!(snapshot.latency_min_us, 0);
    }

    #[test]
    fn test_global_is_shared() {
        let a = ServiceMetrics::global();
        let b = ServiceMetrics::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_increments() {
        use std::thread;

        let metrics = Arc::new(ServiceMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        m.resolver_called();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread panicked");
        }
        assert_eq!(metrics.resolver_calls(), 8000);
    }
}
