//! Asynchronous range readers
//!
//! The cache itself never performs I/O. The readers here implement the other
//! half of the contract: given a byte range, asynchronously produce a buffer
//! of exactly that length or an explicit error, and feed successful reads
//! back into the cache.

mod cached;
mod file;
mod traits;

pub use cached::CachedRangeReader;
pub use file::{FileRangeReader, DEFAULT_QUEUE_DEPTH};
pub use traits::{RangeRead, ReadFuture};
