//! Serviceability facade.
//!
//! [`ServiceabilityService`] is the entry point for queries. It validates the
//! coordinate, answers from the [`ServiceabilityCache`] when it can, and falls
//! back to the [`ZoneResolver`] otherwise. Every call is recorded in
//! [`ServiceMetrics`].

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use super::error::ServiceError;
use crate::cache::ServiceabilityCache;
use crate::coord::Coordinate;
use crate::resolver::{Resolution, ResolutionResult, ResolveError, ZoneResolver};
use crate::telemetry::ServiceMetrics;

/// Public answer to a serviceability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Serviceability {
    pub serviceable: bool,
    pub zone_id: Option<String>,
}

impl From<&ResolutionResult> for Serviceability {
    fn from(result: &ResolutionResult) -> Self {
        Self {
            serviceable: result.is_serviceable(),
            zone_id: result.zone_id().map(|id| id.to_string()),
        }
    }
}

/// Answers "is this point serviceable, and by which zone?".
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct ServiceabilityService {
    resolver: Arc<ZoneResolver>,
    cache: Arc<ServiceabilityCache>,
    metrics: Arc<ServiceMetrics>,
}

impl ServiceabilityService {
    pub fn new(
        resolver: Arc<ZoneResolver>,
        cache: Arc<ServiceabilityCache>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            resolver,
            cache,
            metrics,
        }
    }

    /// Check a raw latitude/longitude pair.
    pub fn check_serviceability(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Serviceability, ServiceError> {
        let coord = Coordinate::new(latitude, longitude).map_err(|e| {
            self.metrics.check_invalid();
            ServiceError::from(e)
        })?;
        self.check(&coord)
    }

    /// Check an already validated coordinate.
    pub fn check(&self, coord: &Coordinate) -> Result<Serviceability, ServiceError> {
        let started = Instant::now();

        if let Some(result) = self.cache.get_current(coord, self.resolver.generation()) {
            self.metrics.cache_hit();
            let answer = Serviceability::from(&result);
            self.metrics
                .check_completed(answer.serviceable, elapsed_us(started));
            return Ok(answer);
        }
        self.metrics.cache_miss();

        match self.resolver.resolve(coord) {
            Ok(Resolution { result, generation }) => {
                self.metrics.resolver_called();
                let answer = Serviceability::from(&result);
                self.cache.put(coord, result, generation);
                self.metrics
                    .check_completed(answer.serviceable, elapsed_us(started));
                Ok(answer)
            }
            Err(ResolveError::IndexUnavailable) => {
                self.metrics.check_unavailable(elapsed_us(started));
                debug!(%coord, "Serviceability check before zone data loaded");
                Err(ServiceError::TemporarilyUnavailable)
            }
        }
    }

    pub fn resolver(&self) -> &Arc<ZoneResolver> {
        &self.resolver
    }

    pub fn cache(&self) -> &Arc<ServiceabilityCache> {
        &self.cache
    }

    pub fn metrics(&self) -> &Arc<ServiceMetrics> {
        &self.metrics
    }
}

fn elapsed_us(started: Instant) -> u64 {
    started.elapsed().as_micros() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::coord::Coordinate;
    use crate::zone::{Ring, Zone, ZoneSet};

    fn square(id: &str, min: f64, max: f64, priority: i32) -> Zone {
        let vertices = [(min, min), (min, max), (max, max), (max, min)]
            .iter()
            .map(|&(lat, lon)| Coordinate::new(lat, lon).unwrap())
            .collect();
        Zone::new(id, vec![Ring::new(vertices).unwrap()], priority).unwrap()
    }

    fn service(cache: CacheConfig) -> ServiceabilityService {
        ServiceabilityService::new(
            Arc::new(ZoneResolver::default()),
            Arc::new(ServiceabilityCache::new(cache)),
            Arc::new(ServiceMetrics::new()),
        )
    }

    fn loaded(cache: CacheConfig) -> ServiceabilityService {
        let service = service(cache);
        let zones = ZoneSet::new(vec![
            square("A", 0.0, 10.0, 1),
            square("B", 5.0, 15.0, 2),
        ])
        .unwrap();
        service.resolver().install(zones);
        service
    }

    // =========================================================================
    // Answers
    // =========================================================================

    #[test]
    fn test_overlapping_zones() {
        let service = loaded(CacheConfig::default());

        let a = service.check_serviceability(2.0, 2.0).unwrap();
        assert_eq!(
            a,
            Serviceability {
                serviceable: true,
                zone_id: Some("A".to_string())
            }
        );

        let b = service.check_serviceability(7.0, 7.0).unwrap();
        assert_eq!(b.zone_id.as_deref(), Some("B"));

        let none = service.check_serviceability(20.0, 20.0).unwrap();
        assert!(!none.serviceable);
        assert!(none.zone_id.is_none());
    }

    #[test]
    fn test_invalid_coordinate() {
        let service = loaded(CacheConfig::default());
        for (lat, lon) in [(91.0, 0.0), (0.0, 181.0), (f64::NAN, 0.0)] {
            let err = service.check_serviceability(lat, lon).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCoordinate(_)));
        }
        assert_eq!(service.metrics().snapshot().invalid, 3);
    }

    #[test]
    fn test_unavailable_before_load() {
        let service = service(CacheConfig::default());
        let err = service.check_serviceability(2.0, 2.0).unwrap_err();
        assert_eq!(err, ServiceError::TemporarilyUnavailable);
        assert!(err.is_retryable());
        assert_eq!(service.metrics().snapshot().unavailable, 1);
        assert!(service.cache().is_empty());
    }

    // =========================================================================
    // Caching
    // =========================================================================

    #[test]
    fn test_repeat_query_served_from_cache() {
        let service = loaded(CacheConfig::default());

        let first = service.check_serviceability(2.0, 2.0).unwrap();
        let second = service.check_serviceability(2.0, 2.0).unwrap();

        assert_eq!(first, second);
        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.resolver_calls, 1);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cache_misses, 1);
        assert_eq!(snapshot.serviceable, 2);
    }

    #[test]
    fn test_unserviceable_answers_are_cached() {
        let service = loaded(CacheConfig::default());
        service.check_serviceability(50.0, 50.0).unwrap();
        service.check_serviceability(50.0, 50.0).unwrap();
        assert_eq!(service.metrics().resolver_calls(), 1);
    }

    #[test]
    fn test_disabled_cache_always_resolves() {
        let service = loaded(CacheConfig::disabled());
        service.check_serviceability(2.0, 2.0).unwrap();
        service.check_serviceability(2.0, 2.0).unwrap();
        assert_eq!(service.metrics().resolver_calls(), 2);
    }

    #[test]
    fn test_reinstall_with_invalidation() {
        let service = loaded(CacheConfig::default());
        assert_eq!(
            service.check_serviceability(7.0, 7.0).unwrap().zone_id.as_deref(),
            Some("B")
        );

        let zones = ZoneSet::new(vec![square("A", 0.0, 10.0, 1)]).unwrap();
        let generation = service.resolver().install(zones);
        service.cache().invalidate(generation);

        assert_eq!(
            service.check_serviceability(7.0, 7.0).unwrap().zone_id.as_deref(),
            Some("A")
        );
    }

    #[test]
    fn test_publish_before_invalidation_skips_stale_entry() {
        let service = loaded(CacheConfig::default());
        assert_eq!(
            service.check_serviceability(12.0, 12.0).unwrap().zone_id.as_deref(),
            Some("B")
        );

        // New snapshot is live but the cache has not been cleared yet
        let zones = ZoneSet::new(vec![square("A", 0.0, 10.0, 1)]).unwrap();
        service.resolver().install(zones);

        let answer = service.check_serviceability(12.0, 12.0).unwrap();
        assert!(!answer.serviceable);
        assert_eq!(service.metrics().resolver_calls(), 2);
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn test_serialize_camel_case() {
        let answer = Serviceability {
            serviceable: true,
            zone_id: Some("A".to_string()),
        };
        let json = serde_json::to_string(&answer).unwrap();
        assert_eq!(json, r#"{"serviceable":true,"zoneId":"A"}"#);
    }

    #[test]
    fn test_concurrent_checks() {
        use std::thread;

        let service = Arc::new(loaded(CacheConfig::default()));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    for i in 0..200 {
                        let lat = (i % 20) as f64 * 0.7 + t as f64 * 0.01;
                        let answer = service.check_serviceability(lat, 2.5).unwrap();
                        if lat < 10.0 {
                            assert_eq!(answer.zone_id.as_deref(), Some("A"));
                        } else {
                            assert!(!answer.serviceable);
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread panicked");
        }
        assert_eq!(service.metrics().snapshot().total_checks(), 1600);
    }
}
