//! Caching layer for autocomplete lookups.
//!
//! Stop names change rarely and the same prefix is typed over and over, so
//! stop finder results are kept for a short while, keyed by the trimmed
//! query. Trip searches are never cached: every one of them advances the
//! provider session.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::Location;

/// Cached autocomplete result.
type LocationEntry = Arc<Vec<Location>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache for autocomplete results.
#[derive(Clone)]
pub struct LocationCache {
    locations: MokaCache<String, LocationEntry>,
}

impl LocationCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let locations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { locations }
    }

    /// Cache key for a query.
    pub fn key(name: &str) -> String {
        name.trim().to_string()
    }

    /// Get a cached result.
    pub async fn get(&self, name: &str) -> Option<LocationEntry> {
        self.locations.get(&Self::key(name)).await
    }

    /// Insert a result.
    pub async fn insert(&self, name: &str, entry: LocationEntry) {
        self.locations.insert(Self::key(name), entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.locations.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.locations.invalidate_all();
    }
}
