use crate::rates::RateSnapshot;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

struct StoredSnapshot {
    snapshot: RateSnapshot,
    stored_at: Instant,
}

/// Single-slot in-process cache holding the last known-good snapshot.
/// The snapshot and its store time live under one lock so a reader never
/// observes a mismatched pair.
pub struct SnapshotCache {
    inner: Mutex<Option<StoredSnapshot>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Returns the stored snapshot if it is younger than `max_age`.
    pub fn get_fresh(&self, max_age: Duration) -> Option<RateSnapshot> {
        let slot = self.inner.lock().unwrap();
        match slot.as_ref() {
            Some(entry) if entry.stored_at.elapsed() < max_age => {
                debug!("memory cache HIT");
                Some(entry.snapshot.clone())
            }
            Some(_) => {
                debug!("memory cache entry is stale");
                None
            }
            None => {
                debug!("memory cache MISS");
                None
            }
        }
    }

    /// Returns the stored snapshot regardless of age.
    pub fn get_any(&self) -> Option<RateSnapshot> {
        let slot = self.inner.lock().unwrap();
        slot.as_ref().map(|entry| entry.snapshot.clone())
    }

    pub fn put(&self, snapshot: RateSnapshot) {
        let mut slot = self.inner.lock().unwrap();
        debug!("memory cache PUT");
        *slot = Some(StoredSnapshot {
            snapshot,
            stored_at: Instant::now(),
        });
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{RateMap, RateRecord};
    use std::thread::sleep;

    fn snapshot(value: f64) -> RateSnapshot {
        let mut rates = RateMap::new();
        rates.insert(
            "usd".to_string(),
            RateRecord {
                value,
                name: None,
                unit: None,
                kind: None,
            },
        );
        RateSnapshot::now(rates)
    }

    #[test]
    fn test_cache_get_put() {
        let cache = SnapshotCache::new();

        // Initially, cache is empty
        assert!(cache.get_fresh(Duration::from_secs(600)).is_none());
        assert!(cache.get_any().is_none());

        cache.put(snapshot(97000.0));

        let fresh = cache.get_fresh(Duration::from_secs(600)).unwrap();
        assert_eq!(fresh.rates["usd"].value, 97000.0);
    }

    #[test]
    fn test_stale_entry_is_skipped_but_kept() {
        let cache = SnapshotCache::new();
        cache.put(snapshot(90000.0));

        sleep(Duration::from_millis(20));

        // Past the freshness window the entry no longer counts as fresh,
        // but it survives as the fallback of last resort.
        assert!(cache.get_fresh(Duration::from_millis(10)).is_none());
        let stale = cache.get_any().unwrap();
        assert_eq!(stale.rates["usd"].value, 90000.0);
    }

    #[test]
    fn test_put_overwrites_previous_entry() {
        let cache = SnapshotCache::new();
        cache.put(snapshot(90000.0));
        cache.put(snapshot(97000.0));

        assert_eq!(cache.get_any().unwrap().rates["usd"].value, 97000.0);
    }
}
