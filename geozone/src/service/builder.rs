//! Wiring for a complete serviceability stack.
//!
//! Each component is created by a small function so callers that need only
//! part of the stack (tests, tools) can reuse the same construction rules.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::config::ServiceConfig;
use super::daemon::RefreshDaemon;
use super::facade::ServiceabilityService;
use super::refresh::{RefreshError, RefreshReport, ZoneRefresher};
use crate::cache::{CacheConfig, ServiceabilityCache};
use crate::repository::ZoneRepository;
use crate::resolver::ZoneResolver;
use crate::telemetry::ServiceMetrics;

/// Create a resolver with no snapshot installed.
pub fn create_resolver(config: &ServiceConfig) -> Arc<ZoneResolver> {
    Arc::new(ZoneResolver::new(*config.index()))
}

/// Create the serviceability cache.
pub fn create_cache(config: &CacheConfig) -> Arc<ServiceabilityCache> {
    if !config.is_enabled() {
        tracing::info!("Serviceability cache disabled");
    }
    Arc::new(ServiceabilityCache::new(config.clone()))
}

/// Service, refresher and their shared components.
pub struct ServiceStack<R> {
    service: Arc<ServiceabilityService>,
    refresher: ZoneRefresher<R>,
}

impl<R: ZoneRepository + 'static> ServiceStack<R> {
    /// Wire a stack around `repository`. No zones are loaded yet; call
    /// [`load`](Self::load) or start the daemon.
    pub fn new(repository: R, config: &ServiceConfig, metrics: Arc<ServiceMetrics>) -> Self {
        let resolver = create_resolver(config);
        let cache = create_cache(config.cache());
        let service = Arc::new(ServiceabilityService::new(
            Arc::clone(&resolver),
            Arc::clone(&cache),
            Arc::clone(&metrics),
        ));
        let refresher = ZoneRefresher::new(repository, resolver, cache, metrics, *config.refresh());

        Self { service, refresher }
    }

    /// Perform one refresh now.
    pub async fn load(&self) -> Result<RefreshReport, RefreshError> {
        self.refresher.refresh().await
    }

    /// Spawn a refresh daemon bound to `shutdown`.
    pub fn start_daemon(&self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        RefreshDaemon::new(self.refresher.clone()).start(shutdown)
    }

    pub fn service(&self) -> &Arc<ServiceabilityService> {
        &self.service
    }

    pub fn refresher(&self) -> &ZoneRefresher<R> {
        &self.refresher
    }
}
