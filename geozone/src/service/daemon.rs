//! Background refresh daemon.
//!
//! Runs [`ZoneRefresher::refresh`] on a fixed interval until shutdown is
//! signalled. After a failed refresh the next attempt is delayed by an
//! exponential backoff (2^n seconds, capped) instead of the interval, so a
//! store outage is retried quickly at first without hammering it.
//!
//! ```ignore
//! let daemon = RefreshDaemon::new(refresher.clone());
//! let handle = daemon.start(shutdown.clone());
//! // ...
//! shutdown.cancel();
//! handle.await?;
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::refresh::ZoneRefresher;
use crate::repository::ZoneRepository;

/// Periodic zone refresher.
pub struct RefreshDaemon<R> {
    refresher: ZoneRefresher<R>,
    interval: Duration,
    max_backoff: Duration,
}

impl<R: ZoneRepository + 'static> RefreshDaemon<R> {
    /// Daemon using the refresher's interval and backoff cap.
    pub fn new(refresher: ZoneRefresher<R>) -> Self {
        let config = *refresher.config();
        Self {
            refresher,
            interval: config.interval,
            max_backoff: config.max_backoff,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the daemon on the current runtime.
    pub fn start(self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Refreshes immediately when no snapshot has been installed yet,
    /// otherwise waits one interval first. Cancellation while a refresh is in
    /// flight stops the loop but lets that refresh finish.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            max_backoff_secs = self.max_backoff.as_secs(),
            source = %self.refresher.repository().describe(),
            "Zone refresh daemon starting"
        );

        let mut delay = if self.refresher.resolver().is_ready() {
            self.interval
        } else {
            Duration::ZERO
        };
        let mut consecutive_failures: u32 = 0;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }

            let result = tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,
                result = self.refresher.refresh() => result,
            };

            match result {
                Ok(_) => {
                    consecutive_failures = 0;
                    delay = self.interval;
                }
                Err(e) => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    delay = calculate_backoff(consecutive_failures, self.max_backoff);
                    debug!(
                        error = %e,
                        consecutive_failures,
                        backoff_secs = delay.as_secs(),
                        "Backing off after failed refresh"
                    );
                    if consecutive_failures == 5 {
                        warn!(consecutive_failures, "Zone refresh keeps failing");
                    }
                }
            }
        }

        info!("Zone refresh daemon stopped");
    }
}

/// Exponential backoff: 2^n seconds, capped at `max`.
pub(crate) fn calculate_backoff(consecutive_failures: u32, max: Duration) -> Duration {
    let secs = 2u64.saturating_pow(consecutive_failures.min(20));
    Duration::from_secs(secs).min(max)
}
