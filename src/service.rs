//! Catalog service - cached list, detail and search operations.
//!
//! Every operation checks the cache first. A hit never reaches the
//! upstream; a miss calls it, normalizes the answer and writes it back.
//! Concurrent misses on the same key may each call upstream (last write wins).

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{character_key, CacheStore, CacheValue, ALL_CHARACTERS_KEY};
use crate::catalog::{
    normalize, CatalogClient, CharacterDetail, CharacterSummary, LookupStrategy, LIST_PAGE_SIZE,
};
use crate::error::CatalogError;

/// A value plus whether it came from the cache.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    pub cached: bool,
}

/// Caching proxy over the upstream catalog.
#[derive(Clone)]
pub struct CatalogService {
    client: CatalogClient,
    cache: Arc<dyn CacheStore>,
}

impl CatalogService {
    pub fn new(client: CatalogClient, cache: Arc<dyn CacheStore>) -> Self {
        Self { client, cache }
    }

    /// Full character list in upstream order.
    pub async fn list_characters(
        &self,
    ) -> Result<Fetched<Arc<Vec<CharacterSummary>>>, CatalogError> {
        if let Some(CacheValue::Characters(list)) = self.cache.get(ALL_CHARACTERS_KEY) {
            debug!("Cache hit: {}", ALL_CHARACTERS_KEY);
            return Ok(Fetched {
                data: list,
                cached: true,
            });
        }

        debug!("Cache miss: {}", ALL_CHARACTERS_KEY);
        let list = Arc::new(self.load_characters().await?);
        self.cache.insert(
            ALL_CHARACTERS_KEY.to_string(),
            CacheValue::Characters(Arc::clone(&list)),
        );

        Ok(Fetched {
            data: list,
            cached: false,
        })
    }

    async fn load_characters(&self) -> Result<Vec<CharacterSummary>, CatalogError> {
        let payload = self.client.fetch_list().await?.into_payload()?;
        let (shape, records) = normalize::character_records(&payload)?;
        debug!("List payload shape: {:?} ({} records)", shape, records.len());

        // No pagination: anything past the first page is not served.
        if records.len() >= LIST_PAGE_SIZE {
            warn!(
                "Upstream returned a full page of {} characters; the catalog may be truncated",
                records.len()
            );
        }

        Ok(records.iter().map(normalize::summary).collect())
    }

    /// Character detail with the complete system prompt.
    ///
    /// Tries each `LookupStrategy` in order and stops at the first hit.
    /// A failed attempt is logged and the next one still runs; only the
    /// last attempt's failure is returned, otherwise `NotFound`.
    pub async fn character_detail(
        &self,
        id: &str,
    ) -> Result<Fetched<Arc<CharacterDetail>>, CatalogError> {
        let key = character_key(id);
        if let Some(CacheValue::Detail(detail)) = self.cache.get(&key) {
            debug!("Cache hit: {}", key);
            return Ok(Fetched {
                data: detail,
                cached: true,
            });
        }

        debug!("Cache miss: {}", key);
        let mut last_error = None;

        for strategy in LookupStrategy::ORDER {
            match self.client.lookup_detail(strategy, id).await {
                Ok(Some(detail)) => {
                    info!(
                        "✅ Loaded character {} ({}): {} - prompt length: {} chars",
                        id,
                        strategy,
                        detail.summary.name.as_deref().unwrap_or("<unnamed>"),
                        detail.prompt_length
                    );
                    let detail = Arc::new(detail);
                    self.cache.insert(key, CacheValue::Detail(Arc::clone(&detail)));
                    return Ok(Fetched {
                        data: detail,
                        cached: false,
                    });
                }
                Ok(None) => {
                    debug!("Character {} not found via {}", id, strategy);
                    last_error = None;
                }
                Err(e) => {
                    warn!("Lookup of character {} via {} failed: {}", id, strategy, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CatalogError::NotFound { id: id.to_string() }))
    }

    /// Characters whose name, category or description contain `query`,
    /// case-insensitively. An empty query matches nothing.
    pub async fn search(&self, query: &str) -> Result<Vec<CharacterSummary>, CatalogError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let characters = self.list_characters().await?.data;
        let needle = query.to_lowercase();

        Ok(characters
            .iter()
            .filter(|c| c.matches(&needle))
            .cloned()
            .collect())
    }
}
