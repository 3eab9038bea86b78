//! In-memory byte-range cache
//!
//! This module provides a cache that records byte ranges previously read from
//! a file and serves later requests that are fully covered by stitching the
//! overlapping stored fragments back into a single buffer, without touching
//! the file again.

mod config;
mod fragment;
mod range_cache;
mod stats;

pub use config::{RangeCacheConfig, DEFAULT_CAPACITY_BYTES};
pub use fragment::Fragment;
pub use range_cache::RangeCache;
pub use stats::{RangeCacheStats, RangeCacheStatsSummary};
