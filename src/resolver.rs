//! Layered rate resolution: external store, then fresh memory, then the
//! upstream provider with write-through, then stale memory as last resort.

use crate::rates::{FetchError, RateProvider, RateSnapshot};
use crate::store::SnapshotStore;
use crate::store::memory::SnapshotCache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long a memory-cache entry counts as fresh.
const MEMORY_MAX_AGE: Duration = Duration::from_secs(600);

/// Server-enforced expiration for write-through entries in the external
/// store.
const EXTERNAL_TTL: Duration = Duration::from_secs(300);

pub struct RateResolver {
    provider: Arc<dyn RateProvider>,
    external: Option<Arc<dyn SnapshotStore>>,
    memory: SnapshotCache,
    memory_max_age: Duration,
}

impl RateResolver {
    pub fn new(provider: Arc<dyn RateProvider>, external: Option<Arc<dyn SnapshotStore>>) -> Self {
        Self {
            provider,
            external,
            memory: SnapshotCache::new(),
            memory_max_age: MEMORY_MAX_AGE,
        }
    }

    #[cfg(test)]
    fn with_memory_max_age(mut self, max_age: Duration) -> Self {
        self.memory_max_age = max_age;
        self
    }

    /// Best-available snapshot, preferring freshness and degrading under
    /// failure. Never errors; `None` means every tier came up empty.
    pub async fn resolve(&self) -> Option<RateSnapshot> {
        if let Some(store) = &self.external {
            match store.get().await {
                Ok(Some(snapshot)) => {
                    debug!("external cache hit");
                    self.memory.put(snapshot.clone());
                    return Some(snapshot);
                }
                Ok(None) => debug!("external cache miss"),
                Err(error) => warn!(%error, "external cache unavailable"),
            }
        }

        if let Some(snapshot) = self.memory.get_fresh(self.memory_max_age) {
            return Some(snapshot);
        }

        match self.provider.fetch_rates().await {
            Ok(rates) => {
                let snapshot = RateSnapshot::now(rates);
                if let Some(store) = &self.external {
                    if let Err(error) = store.put(&snapshot, EXTERNAL_TTL).await {
                        warn!(%error, "external cache write-through failed");
                    }
                }
                self.memory.put(snapshot.clone());
                Some(snapshot)
            }
            Err(FetchError::RateLimited) => {
                warn!("upstream rate limited, serving last known rates");
                self.memory.get_any()
            }
            Err(error) => {
                warn!(%error, "upstream fetch failed, serving last known rates");
                self.memory.get_any()
            }
        }
    }
}
