//! Range reader traits
//!
//! This module defines the contract between the cache's consumers and
//! whatever performs the real file reads.

use std::future::Future;
use std::io;
use std::pin::Pin;

use crate::error::ReadError;
use crate::interval::ByteRange;

/// Boxed future returned by [`RangeRead`] methods.
pub type ReadFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Asynchronous range reader.
///
/// Implementations schedule the read however they like; callers only rely on
/// receiving exactly `range.len()` bytes or an explicit error.
pub trait RangeRead: Send + Sync {
    /// Read the bytes covering `range`.
    fn read_range(&self, range: ByteRange) -> ReadFuture<'_, Result<Vec<u8>, ReadError>>;

    /// Get the current total size of the underlying source in bytes.
    fn size(&self) -> ReadFuture<'_, io::Result<u64>>;
}
