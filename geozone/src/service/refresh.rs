//! Zone refresh: load, rebuild the index, publish, invalidate.
//!
//! [`ZoneRefresher::refresh`] runs the whole sequence in a spawned task, so a
//! caller that stops waiting (timeout, shutdown, dropped request) does not
//! leave a half-finished refresh behind. Concurrent refreshes queue on an
//! async mutex and each one performs a full load.
//!
//! A failed or timed-out load never touches the published snapshot; queries
//! keep being answered from the previous zone set.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::ServiceabilityCache;
use crate::config::{
    RefreshSettings, DEFAULT_LOAD_TIMEOUT_SECS, DEFAULT_MAX_BACKOFF_SECS,
    DEFAULT_REFRESH_INTERVAL_SECS,
};
use crate::geo_index::SpatialIndex;
use crate::repository::{RepositoryError, ZoneRepository};
use crate::resolver::ZoneResolver;
use crate::telemetry::ServiceMetrics;

/// Refresh timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Time between scheduled refreshes
    pub interval: Duration,
    /// Upper bound for the failure backoff
    pub max_backoff: Duration,
    /// Deadline for a single repository load
    pub load_timeout: Duration,
}

impl RefreshConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
            load_timeout: Duration::from_secs(DEFAULT_LOAD_TIMEOUT_SECS),
        }
    }
}

impl From<&RefreshSettings> for RefreshConfig {
    fn from(settings: &RefreshSettings) -> Self {
        Self {
            interval: Duration::from_secs(settings.interval_secs),
            max_backoff: Duration::from_secs(settings.max_backoff_secs),
            load_timeout: Duration::from_secs(settings.load_timeout_secs),
        }
    }
}

/// Why a refresh did not publish a new snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("zone load timed out after {0:?}")]
    Timeout(Duration),

    /// The refresh task panicked or was cancelled by the runtime.
    #[error("refresh task aborted")]
    Aborted,
}

/// Summary of a successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    /// Snapshot generation that was published
    pub generation: u64,
    pub zone_count: usize,
    pub active_count: usize,
    /// Highest zone version in the new set
    pub version: u64,
    pub elapsed: Duration,
}

/// Reloads zones from a repository and publishes them to the resolver.
pub struct ZoneRefresher<R> {
    inner: Arc<RefresherInner<R>>,
}

struct RefresherInner<R> {
    repository: R,
    resolver: Arc<ZoneResolver>,
    cache: Arc<ServiceabilityCache>,
    metrics: Arc<ServiceMetrics>,
    config: RefreshConfig,
    serial: Mutex<()>,
}

impl<R> Clone for ZoneRefresher<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ZoneRepository + 'static> ZoneRefresher<R> {
    pub fn new(
        repository: R,
        resolver: Arc<ZoneResolver>,
        cache: Arc<ServiceabilityCache>,
        metrics: Arc<ServiceMetrics>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            inner: Arc::new(RefresherInner {
                repository,
                resolver,
                cache,
                metrics,
                config,
                serial: Mutex::new(()),
            }),
        }
    }

    /// Load zones, rebuild the index and publish it.
    ///
    /// The work runs in its own task; dropping the returned future does not
    /// cancel it.
    pub async fn refresh(&self) -> Result<RefreshReport, RefreshError> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run().await })
            .await
            .map_err(|e| {
                warn!(error = %e, "Zone refresh task aborted");
                self.inner.metrics.refresh_failed();
                RefreshError::Aborted
            })?
    }

    pub fn repository(&self) -> &R {
        &self.inner.repository
    }

    pub fn resolver(&self) -> &Arc<ZoneResolver> {
        &self.inner.resolver
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.inner.config
    }
}

impl<R: ZoneRepository> RefresherInner<R> {
    async fn run(&self) -> Result<RefreshReport, RefreshError> {
        let _serial = self.serial.lock().await;
        let started = Instant::now();

        let result = self.load_and_install(started).await;
        match &result {
            Ok(report) => {
                self.metrics.refresh_succeeded();
                info!(
                    source = %self.repository.describe(),
                    generation = report.generation,
                    zone_count = report.zone_count,
                    active_count = report.active_count,
                    version = report.version,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Zone refresh complete"
                );
            }
            Err(e) => {
                self.metrics.refresh_failed();
                warn!(
                    source = %self.repository.describe(),
                    error = %e,
                    serving_generation = self.resolver.generation(),
                    "Zone refresh failed"
                );
            }
        }
        result
    }

    async fn load_and_install(&self, started: Instant) -> Result<RefreshReport, RefreshError> {
        let timeout = self.config.load_timeout;
        let zones = tokio::time::timeout(timeout, self.repository.load_zones())
            .await
            .map_err(|_| RefreshError::Timeout(timeout))??;

        let zone_count = zones.len();
        let active_count = zones.active_count();
        let version = zones.version();

        let index_config = *self.resolver.config();
        let index =
            tokio::task::spawn_blocking(move || SpatialIndex::build(Arc::new(zones), &index_config))
                .await
                .map_err(|_| RefreshError::Aborted)?;

        // Until the clear below, lookups skip entries older than `generation`
        let generation = self.resolver.install_index(index);
        self.cache.invalidate(generation);

        Ok(RefreshReport {
            generation,
            zone_count,
            active_count,
            version,
            elapsed: started.elapsed(),
        })
    }
}
