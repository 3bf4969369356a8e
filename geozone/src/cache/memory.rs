//! In-memory serviceability cache with LRU eviction and TTL expiry.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::debug;

use super::bucket::BucketKey;
use super::config::CacheConfig;
use super::stats::CacheStats;
use crate::coord::Coordinate;
use crate::resolver::ResolutionResult;

/// Entry in the serviceability cache.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Cached resolution
    result: ResolutionResult,
    /// When the entry was stored; TTL counts from here
    inserted_at: Instant,
    /// Last access time
    last_accessed: Instant,
    /// Snapshot generation the result was computed against
    generation: u64,
    /// Position in the recency order
    tick: u64,
}

impl CacheEntry {
    fn is_expired(&self, config: &CacheConfig, now: Instant) -> bool {
        now.duration_since(self.inserted_at) >= config.ttl
    }
}

/// Mutable cache state, guarded by one mutex.
#[derive(Debug, Default)]
struct LruState {
    entries: HashMap<BucketKey, CacheEntry>,
    /// Recency order: smallest tick is least recently used
    order: BTreeMap<u64, BucketKey>,
    next_tick: u64,
    /// Puts computed against an older generation are refused
    min_generation: u64,
    stats: CacheStats,
}

impl LruState {
    fn bump(&mut self) -> u64 {
        self.next_tick += 1;
        self.next_tick
    }

    fn remove(&mut self, key: &BucketKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.tick);
        Some(entry)
    }

    fn evict_lru(&mut self) -> bool {
        match self.order.pop_first() {
            Some((_, key)) => {
                self.entries.remove(&key);
                self.stats.evictions += 1;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Bucketed cache of resolution results.
///
/// Nearby coordinates share a [`BucketKey`], so jittered fixes from a moving
/// client hit the same entry. Entries expire `ttl` after insertion and the
/// least recently used entry is evicted once `capacity` is reached.
///
/// A bucket is resolved once, from whichever point in it arrives first. Near
/// a zone boundary the cached answer can differ from what an exact lookup of
/// a later point in the same bucket would give; a finer `bucket_precision`
/// narrows that band.
pub struct ServiceabilityCache {
    state: Mutex<LruState>,
    config: CacheConfig,
}

impl ServiceabilityCache {
    /// Create a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            state: Mutex::new(LruState::default()),
            config,
        }
    }

    /// Look up the cached result for a coordinate's bucket.
    ///
    /// A hit refreshes the entry's recency. Expired entries are removed and
    /// reported as a miss.
    pub fn get(&self, coord: &Coordinate) -> Option<ResolutionResult> {
        self.get_current(coord, 0)
    }

    /// Look up a cached result computed against `generation` or newer.
    ///
    /// An entry from an older snapshot is removed and reported as a miss.
    /// This covers the gap between a new snapshot being published and
    /// [`invalidate`](Self::invalidate) clearing the cache.
    pub fn get_current(&self, coord: &Coordinate, generation: u64) -> Option<ResolutionResult> {
        if !self.config.is_enabled() {
            return None;
        }
        let key = self.key(coord);
        let now = Instant::now();
        let mut state = self.lock();

        let (expired, superseded) = match state.entries.get(&key) {
            Some(entry) => (
                entry.is_expired(&self.config, now),
                entry.generation < generation,
            ),
            None => {
                state.stats.misses += 1;
                return None;
            }
        };
        if expired || superseded {
            state.remove(&key);
            if expired {
                state.stats.expirations += 1;
            }
            state.stats.misses += 1;
            return None;
        }

        let tick = state.bump();
        let entry = state.entries.get_mut(&key)?;
        let old_tick = entry.tick;
        entry.tick = tick;
        entry.last_accessed = now;
        let result = entry.result.clone();
        state.order.remove(&old_tick);
        state.order.insert(tick, key);
        state.stats.hits += 1;
        Some(result)
    }

    /// Store a result computed against snapshot `generation`.
    ///
    /// Returns `false` when nothing was stored: the cache is disabled, or the
    /// result came from a snapshot older than the last invalidation.
    pub fn put(&self, coord: &Coordinate, result: ResolutionResult, generation: u64) -> bool {
        if !self.config.is_enabled() {
            return false;
        }
        let key = self.key(coord);
        let now = Instant::now();
        let mut state = self.lock();

        if generation < state.min_generation {
            state.stats.stale_rejections += 1;
            return false;
        }

        state.remove(&key);
        while state.entries.len() >= self.config.capacity {
            if !state.evict_lru() {
                break;
            }
        }

        let tick = state.bump();
        state.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_at: now,
                last_accessed: now,
                generation,
                tick,
            },
        );
        state.order.insert(tick, key);
        state.stats.insertions += 1;
        true
    }

    /// Drop every entry and refuse later puts from generations before `generation`.
    ///
    /// Called after a new snapshot is installed, so a query that started
    /// against the old snapshot cannot repopulate a stale answer.
    pub fn invalidate(&self, generation: u64) {
        let mut state = self.lock();
        let dropped = state.entries.len();
        state.clear();
        state.min_generation = state.min_generation.max(generation);
        state.stats.invalidations += 1;
        debug!(dropped, generation, "Serviceability cache invalidated");
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.lock();
        let expired: Vec<BucketKey> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(&self.config, now))
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            state.remove(key);
        }
        state.stats.expirations += expired.len() as u64;
        expired.len()
    }

    /// Clear all entries without changing the generation floor.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether a live entry exists for the coordinate's bucket.
    ///
    /// Does not touch recency or statistics.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        let key = self.key(coord);
        let now = Instant::now();
        self.lock()
            .entries
            .get(&key)
            .is_some_and(|entry| !entry.is_expired(&self.config, now))
    }

    /// Snapshot generation recorded for a live entry, if any.
    pub fn generation_of(&self, coord: &Coordinate) -> Option<u64> {
        let key = self.key(coord);
        self.lock().entries.get(&key).map(|entry| entry.generation)
    }

    /// When a live entry was last read or written, if any.
    pub fn last_accessed(&self, coord: &Coordinate) -> Option<Instant> {
        let key = self.key(coord);
        self.lock().entries.get(&key).map(|entry| entry.last_accessed)
    }

    /// Number of entries currently held (including not yet purged expired ones).
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.entry_count = state.entries.len();
        stats
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Bucket key used for a coordinate.
    pub fn key(&self, coord: &Coordinate) -> BucketKey {
        BucketKey::new(coord, self.config.bucket_precision)
    }

    fn lock(&self) -> MutexGuard<'_, LruState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ServiceabilityCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
