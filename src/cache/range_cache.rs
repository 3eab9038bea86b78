//! Range cache implementation
//!
//! Stores previously read byte ranges as immutable fragments and serves later
//! requests that are fully covered by the stored data, stitching overlapping
//! fragments back into a single buffer.

use tracing::debug;

use crate::cache::config::RangeCacheConfig;
use crate::cache::fragment::Fragment;
use crate::cache::stats::RangeCacheStats;
use crate::interval::ByteRange;

/// In-memory cache of byte ranges read from a single file.
///
/// Fragments are kept sorted ascending by interval start; that ordering is
/// the only maintained invariant. Fragments are not guaranteed disjoint: a
/// stored range that is not fully contained by a neighboring fragment is
/// inserted even when it overlaps fragments further away.
///
/// All operations are synchronous and complete in bounded local computation.
/// The cache holds no locks and assumes a single owner; callers sharing it
/// across concurrent contexts must serialize access externally.
pub struct RangeCache {
    /// Configuration
    config: RangeCacheConfig,
    /// Stored fragments, sorted ascending by `range().start()`
    fragments: Vec<Fragment>,
    /// Sum of all fragment lengths, updated only alongside insert/remove
    cached_bytes: u64,
    /// Statistics
    stats: RangeCacheStats,
}

impl RangeCache {
    /// Create a new range cache with the given configuration
    pub fn new(config: RangeCacheConfig) -> Self {
        Self {
            config,
            fragments: Vec::new(),
            cached_bytes: 0,
            stats: RangeCacheStats::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RangeCacheConfig {
        &self.config
    }

    /// Get the statistics
    pub fn stats(&self) -> &RangeCacheStats {
        &self.stats
    }

    /// Get the total number of cached bytes
    pub fn cached_bytes(&self) -> u64 {
        self.cached_bytes
    }

    /// Get the number of stored fragments
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Iterate the stored fragments in ascending start order
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Check if the cache holds no fragments
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    #[inline]
    fn miss<T>(&self) -> Option<T> {
        self.stats.record_miss();
        None
    }

    /// Reconstruct `range` from cached fragments.
    ///
    /// Returns a newly allocated buffer of exactly `range.len()` bytes when
    /// every point of `range` is covered by stored fragments, `None`
    /// otherwise. Partial coverage is a miss; no partial buffer is ever
    /// returned, and nothing is allocated before coverage is proven.
    pub fn lookup(&self, range: ByteRange) -> Option<Vec<u8>> {
        self.stats.record_lookup();

        if range.is_empty() {
            return self.miss();
        }

        let Some(candidates) = self.candidate_run(range) else {
            return self.miss();
        };
        if !Self::covers(candidates, range) {
            return self.miss();
        }

        // Coverage is proven, so the length is bounded by the candidates'
        // total buffer size and fits in memory.
        let mut buffer = vec![0u8; range.len() as usize];
        for fragment in candidates {
            let overlap = fragment.range().intersection(range);
            assert!(
                !overlap.is_empty(),
                "candidate fragment {} does not overlap requested range {}",
                fragment.range(),
                range
            );

            let src_start = (overlap.start() - fragment.range().start()) as usize;
            let src_end = src_start + overlap.len() as usize;
            let dst_start = (overlap.start() - range.start()) as usize;
            let dst_end = dst_start + overlap.len() as usize;
            buffer[dst_start..dst_end].copy_from_slice(&fragment.bytes()[src_start..src_end]);

            // Remaining candidates are redundant once the destination is
            // filled through the end of the request.
            if overlap.end() >= range.end() {
                break;
            }
        }

        self.stats.record_hit();
        Some(buffer)
    }

    /// Record that `data` is the file's content over `range`.
    ///
    /// May evict fragments far from `range` first to respect the capacity
    /// bound, and discards the data when an existing neighboring fragment
    /// already fully contains `range`.
    ///
    /// # Panics
    ///
    /// Panics when `data.len()` does not equal `range.len()`.
    pub fn store(&mut self, range: ByteRange, data: Vec<u8>) {
        self.stats.record_store();
        assert_eq!(
            data.len() as u64,
            range.len(),
            "stored buffer length must equal its range length"
        );

        if range.is_empty() {
            return;
        }

        // Capacity is checked before the new fragment is counted; the
        // eviction target likewise excludes it, so the total may overshoot
        // the bound by up to one fragment after the insert below.
        if self.cached_bytes > self.config.capacity_bytes {
            self.evict_furthest_from(range);
        }

        let index = self
            .fragments
            .partition_point(|f| f.range().start() < range.start());

        let contained = self
            .fragments
            .get(index)
            .is_some_and(|f| f.range().contains_range(range))
            || (index > 0 && self.fragments[index - 1].range().contains_range(range));
        if contained {
            self.stats.record_redundant();
            return;
        }

        self.cached_bytes += range.len();
        self.fragments.insert(index, Fragment::new(range, data));
        self.stats.record_insert();
    }

    /// Remove all fragments and reset the cached byte total
    pub fn clear(&mut self) {
        self.fragments.clear();
        self.cached_bytes = 0;
    }

    /// The maximal run of consecutive fragments that starts at the first
    /// fragment intersecting `range` and in which every fragment intersects
    /// `range`.
    fn candidate_run(&self, range: ByteRange) -> Option<&[Fragment]> {
        let first = self
            .fragments
            .iter()
            .position(|f| f.range().intersects(range))?;
        let len = self.fragments[first..]
            .iter()
            .take_while(|f| f.range().intersects(range))
            .count();
        Some(&self.fragments[first..first + len])
    }

    /// Check that `candidates` (sorted by start) cover every point of `range`
    fn covers(candidates: &[Fragment], range: ByteRange) -> bool {
        let mut covered_to = range.start();
        for fragment in candidates {
            let fragment_range = fragment.range();
            if fragment_range.start() > covered_to {
                return false;
            }
            if fragment_range.end() > covered_to {
                covered_to = fragment_range.end();
            }
            if covered_to >= range.end() {
                return true;
            }
        }
        false
    }

    /// Evict endpoint fragments farthest from `anchor` until the overflow
    /// measured before the pending insert has been freed.
    fn evict_furthest_from(&mut self, anchor: ByteRange) {
        let mut to_free = self.cached_bytes - self.config.capacity_bytes;
        let anchor_midpoint = anchor.midpoint();
        let mut evicted_fragments = 0u64;
        let mut evicted_bytes = 0u64;

        while to_free > 0 && !self.fragments.is_empty() {
            let last = self.fragments.len() - 1;
            let first_distance = self.fragments[0].range().distance_to(anchor_midpoint);
            let last_distance = self.fragments[last].range().distance_to(anchor_midpoint);

            // The last fragment goes only when strictly farther; ties evict
            // the first.
            let victim = if last_distance > first_distance {
                self.fragments.remove(last)
            } else {
                self.fragments.remove(0)
            };

            let len = victim.len();
            self.cached_bytes -= len;
            to_free = to_free.saturating_sub(len);
            evicted_fragments += 1;
            evicted_bytes += len;
        }

        self.stats.record_eviction(evicted_fragments, evicted_bytes);
        debug!(
            fragments = evicted_fragments,
            bytes = evicted_bytes,
            anchor = %anchor,
            "evicted fragments far from access point"
        );
    }
}

impl Default for RangeCache {
    fn default() -> Self {
        Self::new(RangeCacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic byte pattern distinct per file position.
    fn pattern(range: ByteRange) -> Vec<u8> {
        (range.start()..range.end())
            .map(|pos| (pos.wrapping_mul(31).wrapping_add(7) % 251) as u8)
            .collect()
    }

    fn cache_with_capacity(capacity_bytes: u64) -> RangeCache {
        RangeCache::new(RangeCacheConfig::new(capacity_bytes))
    }

    #[test]
    fn test_create_cache() {
        let cache = RangeCache::default();
        assert_eq!(cache.config().capacity_bytes, 5_000_000);
        assert_eq!(cache.cached_bytes(), 0);
        assert_eq!(cache.fragment_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lookup_empty_cache() {
        let cache = cache_with_capacity(1000);
        assert!(cache.lookup(ByteRange::new(0, 10)).is_none());
        assert_eq!(cache.stats().lookup_misses(), 1);
    }

    #[test]
    fn test_lookup_exact_range() {
        let mut cache = cache_with_capacity(1000);
        let range = ByteRange::new(10, 30);
        cache.store(range, pattern(range));

        assert_eq!(cache.lookup(range), Some(pattern(range)));
        assert_eq!(cache.stats().lookup_hits(), 1);
    }

    #[test]
    fn test_lookup_contained_range() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 100), pattern(ByteRange::new(0, 100)));

        let inner = ByteRange::new(18, 32);
        assert_eq!(cache.lookup(inner), Some(pattern(inner)));
    }

    #[test]
    fn test_lookup_stitches_overlapping_fragments() {
        let mut cache = cache_with_capacity(1000);
        for (start, end) in [(0, 15), (5, 25), (20, 35), (30, 45), (40, 50)] {
            let range = ByteRange::new(start, end);
            cache.store(range, pattern(range));
        }

        let request = ByteRange::new(18, 32);
        let buffer = cache.lookup(request).expect("range is fully covered");
        assert_eq!(buffer.len(), 14);
        assert_eq!(buffer, pattern(request));
    }

    #[test]
    fn test_lookup_partial_coverage_is_miss() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 10), pattern(ByteRange::new(0, 10)));
        cache.store(ByteRange::new(20, 30), pattern(ByteRange::new(20, 30)));

        // The gap at [10, 20) makes every spanning request a miss.
        assert!(cache.lookup(ByteRange::new(5, 25)).is_none());
        assert!(cache.lookup(ByteRange::new(9, 11)).is_none());
        assert_eq!(cache.stats().lookup_hits(), 0);
    }

    #[test]
    fn test_lookup_touching_fragments_have_no_gap() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 10), pattern(ByteRange::new(0, 10)));
        cache.store(ByteRange::new(10, 20), pattern(ByteRange::new(10, 20)));

        let request = ByteRange::new(5, 15);
        assert_eq!(cache.lookup(request), Some(pattern(request)));
    }

    #[test]
    fn test_lookup_zero_length_range() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 10), pattern(ByteRange::new(0, 10)));

        assert!(cache.lookup(ByteRange::new(5, 5)).is_none());
        assert_eq!(cache.stats().lookup_misses(), 1);
    }

    #[test]
    fn test_lookup_before_and_after_cached_data() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(50, 60), pattern(ByteRange::new(50, 60)));

        assert!(cache.lookup(ByteRange::new(0, 10)).is_none());
        assert!(cache.lookup(ByteRange::new(90, 100)).is_none());
        assert!(cache.lookup(ByteRange::new(45, 55)).is_none());
        assert!(cache.lookup(ByteRange::new(55, 65)).is_none());
    }

    #[test]
    fn test_shadowing_last_fragment_in_scan_order_wins() {
        let mut cache = cache_with_capacity(1000);
        let first = ByteRange::new(0, 20);
        let second = ByteRange::new(10, 30);
        cache.store(first, vec![0xAA; 20]);
        cache.store(second, vec![0xBB; 20]);

        let buffer = cache.lookup(ByteRange::new(0, 30)).expect("covered");
        assert_eq!(&buffer[..10], &[0xAA; 10]);
        // The overlap [10, 20) belongs to the later fragment in scan order.
        assert_eq!(&buffer[10..], &[0xBB; 20]);
    }

    #[test]
    fn test_store_keeps_fragments_sorted() {
        let mut cache = cache_with_capacity(1000);
        for start in [40u64, 0, 20, 10, 30] {
            let range = ByteRange::with_len(start, 5);
            cache.store(range, pattern(range));
        }

        assert_eq!(cache.fragment_count(), 5);
        assert_eq!(cache.cached_bytes(), 25);
        let starts: Vec<u64> = cache.fragments().map(|f| f.range().start()).collect();
        assert_eq!(starts, [0, 10, 20, 30, 40]);
        let request = ByteRange::new(0, 5);
        assert_eq!(cache.lookup(request), Some(pattern(request)));
    }

    #[test]
    fn test_store_redundant_range_discarded() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 50), pattern(ByteRange::new(0, 50)));

        cache.store(ByteRange::new(10, 20), pattern(ByteRange::new(10, 20)));

        assert_eq!(cache.fragment_count(), 1);
        assert_eq!(cache.cached_bytes(), 50);
        assert_eq!(cache.stats().redundant_stores(), 1);
    }

    #[test]
    fn test_store_equal_range_discarded() {
        let mut cache = cache_with_capacity(1000);
        let range = ByteRange::new(10, 20);
        cache.store(range, pattern(range));
        cache.store(range, pattern(range));

        assert_eq!(cache.fragment_count(), 1);
        assert_eq!(cache.cached_bytes(), 10);
        assert_eq!(cache.stats().redundant_stores(), 1);
    }

    #[test]
    fn test_store_overlapping_non_contained_inserted() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 20), pattern(ByteRange::new(0, 20)));
        cache.store(ByteRange::new(10, 30), pattern(ByteRange::new(10, 30)));

        assert_eq!(cache.fragment_count(), 2);
        assert_eq!(cache.cached_bytes(), 40);
    }

    #[test]
    fn test_store_zero_length_range_discarded() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(10, 10), Vec::new());

        assert_eq!(cache.fragment_count(), 0);
        assert_eq!(cache.cached_bytes(), 0);
    }

    #[test]
    #[should_panic(expected = "stored buffer length")]
    fn test_store_length_mismatch_panics() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 10), vec![0u8; 5]);
    }

    #[test]
    fn test_eviction_removes_furthest_fragment() {
        let mut cache = cache_with_capacity(100);
        // Fill past capacity: 3 fragments of 40 bytes each.
        for start in [0u64, 1000, 2000] {
            let range = ByteRange::with_len(start, 40);
            cache.store(range, pattern(range));
        }
        assert_eq!(cache.cached_bytes(), 120);

        // Anchored near the start, the far fragment at 2000 goes first.
        let anchor = ByteRange::with_len(40, 40);
        cache.store(anchor, pattern(anchor));

        assert!(cache.lookup(ByteRange::with_len(0, 40)).is_some());
        assert!(cache.lookup(ByteRange::with_len(1000, 40)).is_some());
        assert!(cache.lookup(ByteRange::with_len(2000, 40)).is_none());
        assert_eq!(cache.stats().evicted_fragments(), 1);
        assert_eq!(cache.stats().evicted_bytes(), 40);
    }

    #[test]
    fn test_eviction_anchored_at_end_removes_start() {
        let mut cache = cache_with_capacity(100);
        for start in [0u64, 1000, 2000] {
            let range = ByteRange::with_len(start, 40);
            cache.store(range, pattern(range));
        }

        let anchor = ByteRange::with_len(2040, 40);
        cache.store(anchor, pattern(anchor));

        assert!(cache.lookup(ByteRange::with_len(0, 40)).is_none());
        assert!(cache.lookup(ByteRange::with_len(2000, 40)).is_some());
    }

    #[test]
    fn test_eviction_tie_removes_start_most_fragment() {
        let mut cache = cache_with_capacity(50);
        // Midpoints 20 and 120 are equidistant from anchor midpoint 70.
        cache.store(ByteRange::new(0, 40), pattern(ByteRange::new(0, 40)));
        cache.store(ByteRange::new(100, 140), pattern(ByteRange::new(100, 140)));

        let anchor = ByteRange::new(60, 80);
        cache.store(anchor, pattern(anchor));

        assert!(cache.lookup(ByteRange::new(0, 40)).is_none());
        assert!(cache.lookup(ByteRange::new(100, 140)).is_some());
    }

    #[test]
    fn test_capacity_slack_bounded_by_pending_fragment() {
        let capacity = 100u64;
        let mut cache = cache_with_capacity(capacity);

        let mut just_inserted = 0u64;
        for start in (0u64..20).map(|i| i * 1000) {
            let range = ByteRange::with_len(start, 30);
            cache.store(range, pattern(range));
            just_inserted = range.len();
            assert!(cache.cached_bytes() <= capacity + just_inserted);
        }
        assert!(just_inserted > 0);
    }

    #[test]
    fn test_no_eviction_at_exactly_capacity() {
        let mut cache = cache_with_capacity(100);
        cache.store(ByteRange::new(0, 100), pattern(ByteRange::new(0, 100)));

        // The total equals capacity; the next store must not evict first.
        cache.store(ByteRange::new(500, 520), pattern(ByteRange::new(500, 520)));

        assert_eq!(cache.fragment_count(), 2);
        assert_eq!(cache.cached_bytes(), 120);
        assert_eq!(cache.stats().evicted_fragments(), 0);
    }

    #[test]
    fn test_clear() {
        let mut cache = cache_with_capacity(1000);
        cache.store(ByteRange::new(0, 10), pattern(ByteRange::new(0, 10)));
        cache.store(ByteRange::new(20, 30), pattern(ByteRange::new(20, 30)));

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.cached_bytes(), 0);
        assert!(cache.lookup(ByteRange::new(0, 10)).is_none());
        // Lifetime counters survive a clear.
        assert_eq!(cache.stats().store_calls(), 2);
    }

    #[test]
    fn test_lookup_returns_owned_copy() {
        let mut cache = cache_with_capacity(1000);
        let range = ByteRange::new(0, 10);
        cache.store(range, pattern(range));

        let mut buffer = cache.lookup(range).unwrap();
        buffer[0] ^= 0xFF;

        // The caller's mutation never reaches the cached fragment.
        assert_eq!(cache.lookup(range), Some(pattern(range)));
    }
}
