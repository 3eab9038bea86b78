//! Configuration loading helpers.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::RangeCacheConfig;
use crate::reader::DEFAULT_QUEUE_DEPTH;

/// Errors returned by configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading config files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Invalid value for a key.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Raw value string.
        value: String,
    },
    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpancacheConfig {
    /// Cache configuration.
    pub cache: Option<CacheConfigSpec>,
    /// Reader configuration.
    pub reader: Option<ReaderConfigSpec>,
}

impl SpancacheConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from the `SPANCACHE_CONFIG` env var (if set),
    /// then apply `SPANCACHE__section__field` overrides.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config_path = env::var("SPANCACHE_CONFIG").ok();
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment overrides in-place.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        for (key, value) in env::vars() {
            if !key.starts_with("SPANCACHE__") {
                continue;
            }
            let path = key["SPANCACHE__".len()..].to_ascii_lowercase();
            let parts: Vec<&str> = path.split("__").collect();
            let value = value.trim().to_string();

            match parts.as_slice() {
                ["cache", "capacity_bytes"] => {
                    self.cache_mut().capacity_bytes = Some(parse_value(&key, &value)?);
                }
                ["reader", "path"] => {
                    self.reader_mut().path = Some(PathBuf::from(value));
                }
                ["reader", "queue_depth"] => {
                    self.reader_mut().queue_depth = Some(parse_value(&key, &value)?);
                }
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }

        Ok(())
    }

    /// Build a `RangeCacheConfig` using defaults plus overrides.
    pub fn to_range_cache_config(&self) -> RangeCacheConfig {
        let mut config = RangeCacheConfig::default();
        if let Some(cache) = &self.cache {
            cache.apply_to(&mut config);
        }
        config
    }

    /// Resolve the file to serve reads from, if configured.
    pub fn reader_path(&self) -> Option<&Path> {
        self.reader.as_ref()?.path.as_deref()
    }

    /// Resolve the read request queue depth.
    pub fn queue_depth(&self) -> usize {
        self.reader
            .as_ref()
            .and_then(|r| r.queue_depth)
            .unwrap_or(DEFAULT_QUEUE_DEPTH)
    }

    fn cache_mut(&mut self) -> &mut CacheConfigSpec {
        self.cache.get_or_insert_with(Default::default)
    }

    fn reader_mut(&mut self) -> &mut ReaderConfigSpec {
        self.reader.get_or_insert_with(Default::default)
    }
}

/// Cache section overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfigSpec {
    /// Capacity override in bytes.
    pub capacity_bytes: Option<u64>,
}

impl CacheConfigSpec {
    fn apply_to(&self, config: &mut RangeCacheConfig) {
        if let Some(capacity_bytes) = self.capacity_bytes {
            config.capacity_bytes = capacity_bytes;
        }
    }
}

/// Reader section overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReaderConfigSpec {
    /// File to serve reads from.
    pub path: Option<PathBuf>,
    /// Request queue depth override.
    pub queue_depth: Option<usize>,
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
