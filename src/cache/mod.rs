//! Cache module - TTL caching of catalog responses using Moka.
//!
//! ## Architecture
//!
//! - `CacheConfig` - capacity and TTL settings
//! - `TypedCache` - thin typed wrapper over a Moka cache
//! - `CacheStore` - the seam the service talks to, keyed by string
//! - `MemoryStore` - list and details in separate caches
//!
//! ## Usage
//!
//! ```rust
//! let store = memory_store(CacheConfig::default());
//!
//! store.insert(character_key("42"), CacheValue::Detail(detail));
//! let hit = store.get(&character_key("42"));
//! ```

mod config;
mod store;
mod typed;

pub use config::CacheConfig;
pub use store::{character_key, memory_store, CacheStore, CacheValue, ALL_CHARACTERS_KEY};
pub use typed::TypedCache;
