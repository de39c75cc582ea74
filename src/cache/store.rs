//! Cache store seam used by the catalog service.

use std::sync::Arc;

use tracing::debug;

use super::{CacheConfig, TypedCache};
use crate::catalog::{CharacterDetail, CharacterSummary};

/// Key holding the full character list.
pub const ALL_CHARACTERS_KEY: &str = "all_characters";

/// Key holding a single character detail.
pub fn character_key(id: &str) -> String {
    format!("character_{id}")
}

/// A normalized catalog response held in the cache.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Characters(Arc<Vec<CharacterSummary>>),
    Detail(Arc<CharacterDetail>),
}

/// Key/value store with a fixed TTL, shared by all request handlers.
///
/// There is no delete: entries leave only by expiring.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheValue>;

    fn insert(&self, key: String, value: CacheValue);
}

/// In-memory store backed by two Moka caches.
///
/// The list lives in its own single-entry cache so that capacity eviction
/// driven by detail lookups can never push it out or refuse it.
pub struct MemoryStore {
    characters: TypedCache<String, CacheValue>,
    details: TypedCache<String, CacheValue>,
}

impl MemoryStore {
    /// `config.max_capacity` bounds the number of cached details.
    pub fn new(config: CacheConfig) -> Self {
        let list_config = CacheConfig {
            max_capacity: 1,
            ..config.clone()
        };
        let characters = TypedCache::new("characters", list_config);
        let details = TypedCache::new("character_details", config);
        debug!("Created caches: {}, {}", characters.name(), details.name());

        Self {
            characters,
            details,
        }
    }

    fn cache_for(&self, key: &str) -> &TypedCache<String, CacheValue> {
        if key == ALL_CHARACTERS_KEY {
            &self.characters
        } else {
            &self.details
        }
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<CacheValue> {
        self.cache_for(key).get(key)
    }

    fn insert(&self, key: String, value: CacheValue) {
        self.cache_for(&key).insert(key, value);
    }
}

/// Build the in-memory store used at startup.
pub fn memory_store(config: CacheConfig) -> Arc<dyn CacheStore> {
    Arc::new(MemoryStore::new(config))
}
