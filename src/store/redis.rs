use crate::config::CacheConfig;
use crate::rates::RateSnapshot;
use crate::store::SnapshotStore;
use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Fixed key the snapshot lives under in the external store.
const CACHE_KEY: &str = "exchange_rates:latest";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-backed snapshot store. Construction never connects; every call
/// dials with explicit timeouts so a dead server degrades within bounds
/// instead of hanging a request.
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis_url())?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        let connection = timeout(
            CONNECT_TIMEOUT,
            self.client.get_multiplexed_async_connection(),
        )
        .await??;
        Ok(connection)
    }
}

#[async_trait]
impl SnapshotStore for RedisStore {
    async fn get(&self) -> Result<Option<RateSnapshot>> {
        let mut connection = self.connection().await?;
        let raw: Option<String> = timeout(RESPONSE_TIMEOUT, connection.get(CACHE_KEY)).await??;
        match raw {
            Some(payload) => {
                debug!("external cache HIT for key: {}", CACHE_KEY);
                Ok(Some(serde_json::from_str(&payload)?))
            }
            None => {
                debug!("external cache MISS for key: {}", CACHE_KEY);
                Ok(None)
            }
        }
    }

    async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<()> {
        let payload = serde_json::to_string(snapshot)?;
        let mut connection = self.connection().await?;
        let _: () = timeout(
            RESPONSE_TIMEOUT,
            connection.set_ex(CACHE_KEY, payload, ttl.as_secs()),
        )
        .await??;
        debug!("external cache PUT for key: {}", CACHE_KEY);
        Ok(())
    }
}
