//! Stored fragments
//!
//! A fragment is an immutable cached buffer tagged with the byte interval it
//! represents. Fragments are created by `RangeCache::store` and destroyed on
//! eviction or `clear`; their bytes are never mutated in between.

use crate::interval::ByteRange;

/// An immutable cached buffer plus the interval it represents.
#[derive(Debug, Clone)]
pub struct Fragment {
    range: ByteRange,
    bytes: Box<[u8]>,
}

impl Fragment {
    /// Create a fragment from its interval and exactly `range.len()` bytes.
    pub(crate) fn new(range: ByteRange, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len() as u64, range.len());
        Self {
            range,
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// The interval this fragment covers
    #[inline]
    pub fn range(&self) -> ByteRange {
        self.range
    }

    /// The cached bytes
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> u64 {
        self.range.len()
    }
}
