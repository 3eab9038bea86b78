//! spancache - an in-memory byte-range cache for file reads
//!
//! Given previously stored byte ranges of a file, the cache answers whether a
//! newly requested range is fully covered by cached data and, if so,
//! reconstructs the requested bytes by stitching the overlapping stored
//! fragments together, without re-reading the file.
//!
//! # Features
//!
//! - Coverage checks and fragment stitching over half-open byte intervals
//! - Capacity-bounded eviction driven by spatial distance, not recency
//! - A cache-fronted asynchronous file reader built on Tokio
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use spancache::{ByteRange, CachedRangeReader, FileRangeReader, RangeCacheConfig};
//!
//! let file = FileRangeReader::open("media.bin").await?;
//! let mut reader = CachedRangeReader::new(file, RangeCacheConfig::default());
//!
//! // The first read hits the file; overlapping reads afterwards are served
//! // from memory as long as the cache fully covers them.
//! let header = reader.read(ByteRange::new(0, 4096)).await?;
//! let inner = reader.read(ByteRange::new(1024, 2048)).await?;
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod interval;
pub mod reader;

// Re-exports for convenience
pub use cache::{RangeCache, RangeCacheConfig, RangeCacheStats};
pub use error::ReadError;
pub use interval::ByteRange;
pub use reader::{CachedRangeReader, FileRangeReader, RangeRead};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::cache::{RangeCache, RangeCacheConfig, RangeCacheStats};
    pub use crate::error::ReadError;
    pub use crate::interval::ByteRange;
    pub use crate::reader::{CachedRangeReader, FileRangeReader, RangeRead};
}
