//! Bounded LRU cache of solved conversion paths.
//!
//! Keyed by the exact `(source type, preferences)` signature of a request.
//! Every state transition happens under one short-lived mutex; callers
//! never hold it while awaiting converters. There is no invalidation other
//! than capacity-driven eviction, so a converter whose declarations change
//! keeps being used through cached paths until they are evicted.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::trace;
use typeflow_kernel::preferences::ValuePreferences;

use super::path::ConversionPath;

/// Cache key: the source type plus the exact preference entries.
///
/// Weights are compared bit for bit, so requests that differ only in a
/// weight never share a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSignature {
    source_type: String,
    preferences: Vec<(String, u64)>,
}

impl PathSignature {
    pub fn new(source_type: &str, preferences: &ValuePreferences) -> Self {
        Self {
            source_type: source_type.to_string(),
            preferences: preferences
                .iter()
                .map(|(pattern, weight)| (pattern.to_string(), weight.to_bits()))
                .collect(),
        }
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }
}

struct CacheSlot {
    path: Arc<ConversionPath>,
    tick: u64,
}

/// Recency-ordered storage guarded by the cache mutex.
#[derive(Default)]
struct LruState {
    slots: HashMap<PathSignature, CacheSlot>,
    /// tick -> key, oldest first
    order: BTreeMap<u64, PathSignature>,
    next_tick: u64,
}

impl LruState {
    fn bump(&mut self) -> u64 {
        self.next_tick += 1;
        self.next_tick
    }

    fn promote(&mut self, key: &PathSignature) -> Option<Arc<ConversionPath>> {
        let tick = self.bump();
        let slot = self.slots.get_mut(key)?;
        self.order.remove(&slot.tick);
        slot.tick = tick;
        self.order.insert(tick, key.clone());
        Some(Arc::clone(&slot.path))
    }

    fn pop_oldest(&mut self) -> Option<PathSignature> {
        let (_, key) = self.order.pop_first()?;
        self.slots.remove(&key);
        Some(key)
    }
}

/// Counters describing cache activity.
#[derive(Debug, Default)]
struct PathCacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time view of a [`PathCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Thread-safe LRU store of solved paths.
pub struct PathCache {
    capacity: usize,
    state: Mutex<LruState>,
    metrics: PathCacheMetrics,
}

impl PathCache {
    /// Creates an empty cache. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(LruState::default()),
            metrics: PathCacheMetrics::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached path and marks it most recently used.
    pub fn get(&self, key: &PathSignature) -> Option<Arc<ConversionPath>> {
        let found = self.state.lock().promote(key);
        let counter = if found.is_some() {
            &self.metrics.hits
        } else {
            &self.metrics.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Whether `key` is cached, without touching its recency.
    pub fn contains(&self, key: &PathSignature) -> bool {
        self.state.lock().slots.contains_key(key)
    }

    /// Stores a path as most recently used.
    ///
    /// Replaces any existing entry for the key. Returns the key evicted to
    /// stay within capacity, if any.
    pub fn put(&self, key: PathSignature, path: Arc<ConversionPath>) -> Option<PathSignature> {
        let mut state = self.state.lock();
        let tick = state.bump();
        if let Some(previous) = state.slots.insert(key.clone(), CacheSlot { path, tick }) {
            state.order.remove(&previous.tick);
        }
        state.order.insert(tick, key);
        self.metrics.insertions.fetch_add(1, Ordering::Relaxed);

        if state.slots.len() <= self.capacity {
            return None;
        }
        let evicted = state.pop_oldest();
        drop(state);

        if let Some(key) = &evicted {
            self.metrics.evictions.fetch_add(1, Ordering::Relaxed);
            trace!(source_type = key.source_type(), "evicted cached path");
        }
        evicted
    }

    pub fn stats(&self) -> PathCacheStats {
        PathCacheStats {
            hits: self.metrics.hits.load(Ordering::Relaxed),
            misses: self.metrics.misses.load(Ordering::Relaxed),
            insertions: self.metrics.insertions.load(Ordering::Relaxed),
            evictions: self.metrics.evictions.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity,
        }
    }
}

impl std::fmt::Debug for PathCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
