//! Rate types shared across the cache tiers and the upstream provider seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Per-currency record as the upstream reports it. `value` is the exchange
/// rate; the descriptive fields are carried through when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

pub type RateMap = HashMap<String, RateRecord>;

/// The last known-good rates plus the time they were fetched. Serialized
/// with camelCase names so the external-cache JSON and the API payload
/// agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub rates: RateMap,
    pub updated_at: String,
}

impl RateSnapshot {
    /// Stamps `rates` with the current UTC time.
    pub fn now(rates: RateMap) -> Self {
        Self {
            rates,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Upstream fetch failure. Rate limiting is its own variant so callers can
/// log and degrade distinctly from other failures.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream rate limit hit (HTTP 429)")]
    RateLimited,
    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed upstream response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateMap, FetchError>;
}
