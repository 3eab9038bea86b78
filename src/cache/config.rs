//! Range cache configuration

/// Default upper bound on total cached bytes (5 MB).
pub const DEFAULT_CAPACITY_BYTES: u64 = 5_000_000;

/// Configuration for the range cache
#[derive(Debug, Clone)]
pub struct RangeCacheConfig {
    /// Upper bound on total cached bytes. Eviction keeps the cache near this
    /// bound; the total may exceed it by up to one fragment (the pending
    /// insert is not counted against the eviction target).
    pub capacity_bytes: u64,
}

impl Default for RangeCacheConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
        }
    }
}

impl RangeCacheConfig {
    /// Create a new range cache configuration
    pub fn new(capacity_bytes: u64) -> Self {
        Self { capacity_bytes }
    }

    /// Set the capacity in bytes
    pub fn with_capacity_bytes(mut self, capacity_bytes: u64) -> Self {
        self.capacity_bytes = capacity_bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RangeCacheConfig::default();
        assert_eq!(config.capacity_bytes, 5_000_000);
    }

    #[test]
    fn test_config_builder() {
        let config = RangeCacheConfig::new(1024).with_capacity_bytes(2048);
        assert_eq!(config.capacity_bytes, 2048);
    }
}
