pub mod config;
pub mod log;
pub mod providers;
pub mod rates;
pub mod resolver;
pub mod server;
pub mod store;

use crate::config::AppConfig;
use crate::providers::coingecko::CoinGeckoProvider;
use crate::resolver::RateResolver;
use crate::store::SnapshotStore;
use crate::store::redis::RedisStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Wires the upstream provider and cache tiers into a resolver. A missing
/// or invalid cache configuration degrades to memory-cache-only operation
/// rather than failing startup.
pub fn build_resolver(config: &AppConfig) -> Result<RateResolver> {
    let base_url = config
        .providers
        .coingecko
        .as_ref()
        .map_or("https://api.coingecko.com", |provider| &provider.base_url);
    let provider =
        CoinGeckoProvider::new(base_url).context("Failed to build upstream HTTP client")?;

    let external: Option<Arc<dyn SnapshotStore>> = match &config.cache {
        Some(cache_config) => match RedisStore::new(cache_config) {
            Ok(store) => Some(Arc::new(store)),
            Err(error) => {
                warn!(%error, "Invalid cache configuration, running with memory cache only");
                None
            }
        },
        None => {
            info!("No external cache configured, running with memory cache only");
            None
        }
    };

    Ok(RateResolver::new(Arc::new(provider), external))
}

pub async fn run(config: AppConfig) -> Result<()> {
    info!("coinboard starting...");

    let resolver = build_resolver(&config)?;
    let state = server::AppState {
        resolver: Arc::new(resolver),
    };
    let app = server::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
