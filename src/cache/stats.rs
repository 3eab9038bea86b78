//! Range cache statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for range cache operations
#[derive(Debug, Default)]
pub struct RangeCacheStats {
    /// Number of lookup calls
    lookup_calls: AtomicU64,
    /// Number of lookups served entirely from cached fragments
    lookup_hits: AtomicU64,
    /// Number of lookup misses (including partial coverage)
    lookup_misses: AtomicU64,
    /// Number of store calls
    store_calls: AtomicU64,
    /// Number of fragments actually inserted
    inserts: AtomicU64,
    /// Number of stores discarded as fully contained in an existing fragment
    redundant_stores: AtomicU64,
    /// Number of evicted fragments
    evicted_fragments: AtomicU64,
    /// Number of evicted bytes
    evicted_bytes: AtomicU64,
}

impl RangeCacheStats {
    /// Create new statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup call
    pub(crate) fn record_lookup(&self) {
        self.lookup_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache hit
    pub(crate) fn record_hit(&self) {
        self.lookup_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub(crate) fn record_miss(&self) {
        self.lookup_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a store call
    pub(crate) fn record_store(&self) {
        self.store_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inserted fragment
    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a store discarded as redundant
    pub(crate) fn record_redundant(&self) {
        self.redundant_stores.fetch_add(1, Ordering::Relaxed);
    }

    /// Record evicted fragments
    pub(crate) fn record_eviction(&self, fragments: u64, bytes: u64) {
        self.evicted_fragments.fetch_add(fragments, Ordering::Relaxed);
        self.evicted_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Get the number of lookup calls
    pub fn lookup_calls(&self) -> u64 {
        self.lookup_calls.load(Ordering::Relaxed)
    }

    /// Get the number of cache hits
    pub fn lookup_hits(&self) -> u64 {
        self.lookup_hits.load(Ordering::Relaxed)
    }

    /// Get the number of cache misses
    pub fn lookup_misses(&self) -> u64 {
        self.lookup_misses.load(Ordering::Relaxed)
    }

    /// Get the hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let calls = self.lookup_calls.load(Ordering::Relaxed);
        if calls == 0 {
            return 0.0;
        }
        self.lookup_hits.load(Ordering::Relaxed) as f64 / calls as f64
    }

    /// Get the number of store calls
    pub fn store_calls(&self) -> u64 {
        self.store_calls.load(Ordering::Relaxed)
    }

    /// Get the number of inserted fragments
    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Get the number of stores discarded as redundant
    pub fn redundant_stores(&self) -> u64 {
        self.redundant_stores.load(Ordering::Relaxed)
    }

    /// Get the number of evicted fragments
    pub fn evicted_fragments(&self) -> u64 {
        self.evicted_fragments.load(Ordering::Relaxed)
    }

    /// Get the number of evicted bytes
    pub fn evicted_bytes(&self) -> u64 {
        self.evicted_bytes.load(Ordering::Relaxed)
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.lookup_calls.store(0, Ordering::Relaxed);
        self.lookup_hits.store(0, Ordering::Relaxed);
        self.lookup_misses.store(0, Ordering::Relaxed);
        self.store_calls.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.redundant_stores.store(0, Ordering::Relaxed);
        self.evicted_fragments.store(0, Ordering::Relaxed);
        self.evicted_bytes.store(0, Ordering::Relaxed);
    }

    /// Get a summary of all statistics
    pub fn summary(&self) -> RangeCacheStatsSummary {
        RangeCacheStatsSummary {
            lookup_calls: self.lookup_calls(),
            lookup_hits: self.lookup_hits(),
            lookup_misses: self.lookup_misses(),
            hit_rate: self.hit_rate(),
            store_calls: self.store_calls(),
            inserts: self.inserts(),
            redundant_stores: self.redundant_stores(),
            evicted_fragments: self.evicted_fragments(),
            evicted_bytes: self.evicted_bytes(),
        }
    }
}

/// Summary of range cache statistics
#[derive(Debug, Clone)]
pub struct RangeCacheStatsSummary {
    /// Number of lookup calls
    pub lookup_calls: u64,
    /// Number of cache hits
    pub lookup_hits: u64,
    /// Number of cache misses
    pub lookup_misses: u64,
    /// Cache hit rate
    pub hit_rate: f64,
    /// Number of store calls
    pub store_calls: u64,
    /// Number of inserted fragments
    pub inserts: u64,
    /// Number of stores discarded as redundant
    pub redundant_stores: u64,
    /// Number of evicted fragments
    pub evicted_fragments: u64,
    /// Number of evicted bytes
    pub evicted_bytes: u64,
}
