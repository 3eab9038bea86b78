//! Cache-fronted range reader

use crate::cache::{RangeCache, RangeCacheConfig};
use crate::error::ReadError;
use crate::interval::ByteRange;
use crate::reader::traits::RangeRead;

/// Range reader that consults a [`RangeCache`] before touching the file.
///
/// On a miss the requested range is read through the inner reader and stored
/// in the cache before the bytes are returned; the cache keeps its own copy,
/// so every buffer handed out is owned by the caller. The cache never
/// initiates I/O itself.
pub struct CachedRangeReader<R: RangeRead> {
    reader: R,
    cache: RangeCache,
}

impl<R: RangeRead> CachedRangeReader<R> {
    /// Wrap `reader` with a cache built from `config`.
    pub fn new(reader: R, config: RangeCacheConfig) -> Self {
        Self {
            reader,
            cache: RangeCache::new(config),
        }
    }

    /// Read `range`, serving it from the cache when fully covered.
    pub async fn read(&mut self, range: ByteRange) -> Result<Vec<u8>, ReadError> {
        if let Some(bytes) = self.cache.lookup(range) {
            return Ok(bytes);
        }

        let bytes = self.reader.read_range(range).await?;
        self.cache.store(range, bytes.clone());
        Ok(bytes)
    }

    /// Get the underlying cache
    pub fn cache(&self) -> &RangeCache {
        &self.cache
    }

    /// Get mutable access to the underlying cache
    pub fn cache_mut(&mut self) -> &mut RangeCache {
        &mut self.cache
    }

    /// Get the inner reader
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Discard the cache and return the inner reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}
