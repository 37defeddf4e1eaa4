//! In-process cache-aside helper with a fixed time-to-live.
//!
//! Concurrent misses on the same key may each run `compute`; the last write
//! wins. Expired entries are invisible immediately and physically removed by
//! the sweeper.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// String-keyed value cache with a default expiry.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Duration,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Live value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let map = self.entries.read().ok()?;
        map.get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` with the default expiry.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        if let Ok(mut map) = self.entries.write() {
            map.insert(
                key.into(),
                Entry {
                    value,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut map) = self.entries.write() {
            map.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        match self.entries.write() {
            Ok(mut map) => {
                let before = map.len();
                map.retain(|_, entry| entry.expires_at > now);
                before - map.len()
            }
            Err(_) => 0,
        }
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// result. Failures are returned and never cached.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return Ok(value);
        }

        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Start the periodic sweep. The task ends once the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let removed = cache.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "swept expired cache entries");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(5 * 60);

    async fn load(calls: &AtomicUsize, value: &str) -> Result<Vec<String>, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![value.to_string()])
    }

    #[tokio::test(start_paused = true)]
    async fn serves_cached_value_within_ttl() {
        let cache = TtlCache::new(TTL);
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute("websites", || load(&calls, "a")).await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        let second = cache.get_or_compute("websites", || load(&calls, "b")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recomputes_after_expiry() {
        let cache = TtlCache::new(TTL);
        let calls = AtomicUsize::new(0);

        cache.get_or_compute("websites", || load(&calls, "a")).await.unwrap();
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        let refreshed = cache.get_or_compute("websites", || load(&calls, "b")).await.unwrap();

        assert_eq!(refreshed, vec!["b".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_cached() {
        let cache: TtlCache<Vec<String>> = TtlCache::new(TTL);

        let err = cache
            .get_or_compute("websites", || async { Err::<Vec<String>, _>("db down".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "db down");
        assert!(cache.get("websites").is_none());

        let calls = AtomicUsize::new(0);
        cache.get_or_compute("websites", || load(&calls, "ok")).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_independent() {
        let cache = TtlCache::new(TTL);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.remove("a");

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_evicts_expired_entries() {
        let cache = Arc::new(TtlCache::new(TTL));
        cache.insert("websites", 1);
        let sweeper = cache.spawn_sweeper(Duration::from_secs(10 * 60));

        tokio::time::sleep(Duration::from_secs(10 * 60 + 1)).await;
        tokio::task::yield_now().await;
        assert!(cache.is_empty());

        drop(cache);
        tokio::time::sleep(Duration::from_secs(10 * 60 + 1)).await;
        assert!(sweeper.await.is_ok());
    }
}
