//! In-memory zone repository.
//!
//! Serves a fixed set of records. The records can be swapped, the next loads
//! can be made to fail, and each load can be delayed, which is how refresh
//! behaviour is exercised without a real store.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::error::RepositoryError;
use super::record::{zones_from_records, ZoneRecord};
use super::ZoneRepository;
use crate::zone::ZoneSet;

#[derive(Debug, Default)]
pub struct StaticZoneRepository {
    records: Mutex<Vec<ZoneRecord>>,
    delay: Mutex<Option<Duration>>,
    failing: AtomicBool,
    loads: AtomicU64,
}

impl StaticZoneRepository {
    pub fn new(records: Vec<ZoneRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    /// Replace the records served by subsequent loads.
    pub fn replace(&self, records: Vec<ZoneRecord>) {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records;
    }

    /// Make subsequent loads fail with [`RepositoryError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Sleep this long before answering each load.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Number of loads started.
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ZoneRepository for StaticZoneRepository {
    async fn load_zones(&self) -> Result<ZoneSet, RepositoryError> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }

        let records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Ok(zones_from_records(records)?.zones)
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
