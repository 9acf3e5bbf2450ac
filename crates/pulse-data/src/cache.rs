//! Stale-tolerant data caching.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use pulse_core::error::ProviderError;
use tracing::{debug, error, info, warn};

/// Cache entry with the time it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(payload: T) -> Self {
        Self {
            payload,
            fetched_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// Where a returned payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Entry was within its TTL; no fetch happened
    Hit,
    /// Fetch succeeded and replaced the entry
    Refreshed,
    /// Fetch failed and an expired entry was served instead
    Stale,
}

/// A payload plus where it came from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub payload: T,
    pub freshness: Freshness,
    /// Age of the payload when returned
    pub age: Duration,
}

/// Keyed TTL cache that prefers old data over errors.
///
/// Entries are never evicted: an expired entry stays around as a fallback
/// for when the upstream fetch fails. The lock is never held while a fetch
/// is in flight, so two callers missing the same key may both fetch.
#[derive(Debug)]
pub struct StaleCache<T> {
    name: String,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> StaleCache<T> {
    /// Create an empty cache; `name` labels its log lines.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the cached payload or fetch a new one.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        self.fetch_tracked(key, ttl, fetch)
            .await
            .map(|fetched| fetched.payload)
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch), also reporting freshness.
    pub async fn fetch_tracked<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<Fetched<T>, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        if let Some((payload, age)) = self.lookup(key) {
            if age < ttl {
                debug!(cache = %self.name, key, age_ms = age.as_millis() as u64, "Cache hit");
                return Ok(Fetched {
                    payload,
                    freshness: Freshness::Hit,
                    age,
                });
            }
        }

        match fetch().await {
            Ok(payload) => {
                self.store(key, payload.clone());
                info!(cache = %self.name, key, "Cache refreshed");
                Ok(Fetched {
                    payload,
                    freshness: Freshness::Refreshed,
                    age: Duration::ZERO,
                })
            }
            Err(err) => match self.lookup(key) {
                Some((payload, age)) => {
                    warn!(
                        cache = %self.name,
                        key,
                        age_secs = age.as_secs(),
                        error = %err,
                        "Serving stale entry after fetch failure"
                    );
                    Ok(Fetched {
                        payload,
                        freshness: Freshness::Stale,
                        age,
                    })
                }
                None => {
                    error!(cache = %self.name, key, error = %err, "Fetch failed with nothing cached");
                    Err(err)
                }
            },
        }
    }

    fn lookup(&self, key: &str) -> Option<(T, Duration)> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .map(|entry| (entry.payload.clone(), entry.age()))
    }

    fn store(&self, key: &str, payload: T) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), CacheEntry::new(payload));
    }

    /// Number of keys held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Age of the entry for `key`, if any.
    pub fn age_of(&self, key: &str) -> Option<Duration> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(CacheEntry::age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const LONG: Duration = Duration::from_secs(3600);

    fn failing() -> ProviderError {
        ProviderError::Status {
            status: 503,
            body: "unavailable".into(),
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl_fetches_once() {
        let cache = StaleCache::new("prices");
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_fetch("prices", LONG, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1.0, 2.0])
                })
                .await
                .unwrap();
            assert_eq!(value, vec![1.0, 2.0]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refreshed() {
        let cache = StaleCache::new("detail");
        cache
            .get_or_fetch("bitcoin", LONG, || async { Ok(1) })
            .await
            .unwrap();

        let fetched = cache
            .fetch_tracked("bitcoin", Duration::ZERO, || async { Ok(2) })
            .await
            .unwrap();

        assert_eq!(fetched.payload, 2);
        assert_eq!(fetched.freshness, Freshness::Refreshed);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_serves_stale_payload() {
        let cache = StaleCache::new("history");
        cache
            .get_or_fetch("bitcoin_30", LONG, || async { Ok("old".to_string()) })
            .await
            .unwrap();

        let fetched = cache
            .fetch_tracked("bitcoin_30", Duration::ZERO, || async { Err(failing()) })
            .await
            .unwrap();

        assert_eq!(fetched.payload, "old");
        assert_eq!(fetched.freshness, Freshness::Stale);
        // The stale entry is kept, not replaced or dropped
        assert!(cache.contains_key("bitcoin_30"));
    }

    #[tokio::test]
    async fn test_cold_failure_propagates() {
        let cache: StaleCache<u32> = StaleCache::new("futures");

        let result = cache
            .get_or_fetch("futures_bitcoin", LONG, || async { Err(failing()) })
            .await;

        assert!(matches!(
            result,
            Err(ProviderError::Status { status: 503, .. })
        ));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = StaleCache::new("history");
        cache
            .get_or_fetch("bitcoin_7", LONG, || async { Ok(7) })
            .await
            .unwrap();
        cache
            .get_or_fetch("bitcoin_30", LONG, || async { Ok(30) })
            .await
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.age_of("bitcoin_7").is_some());
        assert!(cache.age_of("ethereum_7").is_none());
    }
}
