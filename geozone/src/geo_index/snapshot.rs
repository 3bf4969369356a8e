//! Published index snapshots.
//!
//! [`SnapshotCell`] holds the currently authoritative [`SpatialIndex`].
//! Publishing builds nothing under the lock: the caller hands over a finished
//! index and the cell swaps one `Arc` under a brief write lock. Readers clone
//! the `Arc` and keep using it even if a newer snapshot is published while
//! their query runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use super::index::SpatialIndex;

/// One published index and the generation it was published as.
#[derive(Debug)]
pub struct IndexSnapshot {
    index: SpatialIndex,
    generation: u64,
    installed_at: Instant,
}

impl IndexSnapshot {
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Monotonic publish counter, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn installed_at(&self) -> Instant {
        self.installed_at
    }
}

/// Atomically swappable holder of the current snapshot.
#[derive(Debug, Default)]
pub struct SnapshotCell {
    current: RwLock<Option<Arc<IndexSnapshot>>>,
    generation: AtomicU64,
}

impl SnapshotCell {
    /// An empty cell; [`load`](Self::load) returns `None` until the first publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new index, returning its generation.
    ///
    /// Generations are assigned under the write lock, so a later publish
    /// always carries a higher generation than the snapshot it replaces.
    pub fn publish(&self, index: SpatialIndex) -> u64 {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        *current = Some(Arc::new(IndexSnapshot {
            index,
            generation,
            installed_at: Instant::now(),
        }));
        generation
    }

    /// The current snapshot, if one has ever been published.
    pub fn load(&self) -> Option<Arc<IndexSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Generation of the latest publish (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}
