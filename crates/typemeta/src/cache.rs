// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent compute-once cache.
//!
//! Each key owns a slot guarded by its own mutex. The first caller for a key
//! locks the slot and computes. Concurrent callers for the same key block on
//! that slot and then read the published value, so a value is computed at
//! most once per key and nobody ever observes a half-built one. Callers for
//! different keys never contend beyond the sharded map.
//!
//! A computation that fails leaves its slot empty; the next caller retries.
//! Entries are never evicted.
//!
//! A computation must not request its own key (directly or through other
//! keys). Callers detect such cycles before entering the cache.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub last_hit_ns: u64,
    pub last_miss_ns: u64,
}

type Slot<V> = Arc<Mutex<Option<V>>>;

/// Map from key to a lazily computed, then immutable, value.
pub struct ComputeCache<K, V> {
    slots: DashMap<K, Slot<V>>,
    published: AtomicUsize,
    stats: RwLock<LookupStats>,
}

impl<K, V> ComputeCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            published: AtomicUsize::new(0),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// Published value for `key`, without computing.
    ///
    /// Blocks while another caller is computing the same key.
    pub fn get(&self, key: &K) -> Option<V> {
        let start = Instant::now();
        let slot = self.slots.get(key).map(|s| Arc::clone(s.value()))?;
        let value = slot.lock().clone();
        if value.is_some() {
            self.record_hit(start);
        }
        value
    }

    /// Value for `key`, computing it with `compute` if absent.
    pub fn get_or_try_compute<F, E>(&self, key: &K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let start = Instant::now();
        // Clone the slot out so no shard lock is held while computing.
        let slot = match self.slots.get(key) {
            Some(existing) => Arc::clone(existing.value()),
            None => Arc::clone(self.slots.entry(key.clone()).or_default().value()),
        };

        let mut guard = slot.lock();
        if let Some(value) = guard.as_ref() {
            self.record_hit(start);
            return Ok(value.clone());
        }

        let value = compute()?;
        *guard = Some(value.clone());
        self.published.fetch_add(1, Ordering::Release);
        self.record_miss(start);
        Ok(value)
    }

    /// Number of published values.
    ///
    /// Never waits on a running computation.
    pub fn len(&self) -> usize {
        self.published.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn record_hit(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
        stats.last_hit_ns = start.elapsed().as_nanos() as u64;
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_miss_ns = start.elapsed().as_nanos() as u64;
    }
}

impl<K, V> Default for ComputeCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
