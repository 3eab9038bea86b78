//! Error types for range reads
//!
//! Cache misses are not errors: `RangeCache::lookup` reports them as `None`.
//! The errors here are the explicit failure signals of the readers that feed
//! the cache.

use std::io;

/// Errors surfaced by range readers.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// I/O error from the underlying file.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// The read task has shut down and can no longer serve requests.
    #[error("read channel closed")]
    ChannelClosed,
    /// The file ended before the requested range was fully read.
    #[error("unexpected end of file reading {wanted} bytes at offset {offset}")]
    UnexpectedEof {
        /// Offset the read started at.
        offset: u64,
        /// Bytes requested from that offset.
        wanted: u64,
    },
}
