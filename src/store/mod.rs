pub mod memory;
pub mod redis;

use crate::rates::RateSnapshot;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// External snapshot store seam. The resolver treats `Err` as "tier
/// unavailable" and falls through; implementations report failures rather
/// than absorb them.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn get(&self) -> Result<Option<RateSnapshot>>;
    async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<()>;
}
