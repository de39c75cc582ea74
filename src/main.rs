//! Persona Vault - character catalog caching proxy.
//!
//! Proxies a third-party character catalog, caches normalized responses
//! for an hour and serves a small browser UI for reading and exporting
//! each character's system prompt.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `cache` - TTL caching with Moka
//! - `catalog` - Upstream client and response normalization
//! - `service` - Cached list / detail / search operations
//! - `server` - Axum HTTP API and static files
//! - `error` - Error taxonomy and status mapping

mod cache;
mod catalog;
mod config;
mod error;
mod server;
mod service;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::CacheConfig;
use catalog::CatalogClient;
use config::Config;
use service::CatalogService;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("persona_vault=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Persona Vault...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Upstream catalog: {}", config.catalog_api_url);

    let cache_config = CacheConfig::default();
    info!(
        "Cache initialized (TTL {}s, up to {} details)",
        cache_config.ttl.as_secs(),
        cache_config.max_capacity
    );
    let cache = cache::memory_store(cache_config);

    let client = CatalogClient::new(config.catalog_api_url.clone());
    let catalog = CatalogService::new(client, cache);

    server::serve(&config, catalog).await
}
