//! Cache configuration.

use std::time::Duration;

/// Time-to-live applied to catalog responses.
pub const CATALOG_TTL: Duration = Duration::from_secs(3600);

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache. Past this bound Moka may
    /// evict or refuse entries before their TTL runs out.
    pub max_capacity: u64,

    /// Time-to-live for cache entries, counted from the write.
    /// After this duration, entries are treated as absent.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: CATALOG_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with the given max capacity.
    #[cfg(test)]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live for cache entries.
    #[cfg(test)]
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = duration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_hour() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[test]
    fn test_builder_keeps_capacity() {
        let config = CacheConfig::with_capacity(50).ttl(Duration::from_millis(10));
        assert_eq!(config.max_capacity, 50);
        assert_eq!(config.ttl, Duration::from_millis(10));
    }
}
