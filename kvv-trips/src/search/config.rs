//! Configuration for the trip search controller.

use std::time::Duration;

use crate::cache::CacheConfig;

/// Configuration parameters for a [`TripSearch`](super::TripSearch).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// How long autocomplete results are reused (seconds).
    pub cache_ttl_secs: u64,

    /// Maximum number of autocomplete queries kept.
    pub cache_capacity: u64,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(cache_ttl_secs: u64, cache_capacity: u64) -> Self {
        Self {
            cache_ttl_secs,
            cache_capacity,
        }
    }

    /// Returns the cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.cache_ttl(),
            max_capacity: self.cache_capacity,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 600, // 10 minutes
            cache_capacity: 1000,
        }
    }
}
