//! In-memory query cache with expiry.
//!
//! Keys are normalized (trimmed, lowercased) so "Foo" and "foo" share an
//! entry. Expired entries are invisible to `get` and are physically removed
//! by `sweep_expired`.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::entry::{CacheEntry, CacheLifetime};

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lifetime: CacheLifetime,
}

/// Concurrency-safe map from query string to cached value.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    inner: RwLock<Inner<V>>,
}

/// Normalize a query string into its cache key.
pub fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new(lifetime: CacheLifetime) -> Self {
        Self { inner: RwLock::new(Inner { entries: HashMap::new(), lifetime }) }
    }

    /// Get a value if present and not expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(&cache_key(key))
            .filter(|entry| !entry.is_expired(inner.lifetime))
            .map(|entry| entry.value.clone())
    }

    /// Insert or replace a value, restarting its lifetime.
    pub async fn put(&self, key: &str, value: V) {
        let mut inner = self.inner.write().await;
        inner.entries.insert(cache_key(key), CacheEntry::new(value));
    }

    /// Drop every entry regardless of age.
    pub async fn clear(&self) {
        self.inner.write().await.entries.clear();
    }

    /// Remove all expired entries, returning how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let lifetime = inner.lifetime;
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(lifetime));
        let removed = before - inner.entries.len();
        if removed > 0 {
            tracing::debug!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn lifetime(&self) -> CacheLifetime {
        self.inner.read().await.lifetime
    }

    /// Change the lifetime applied to existing and future entries.
    pub async fn set_lifetime(&self, lifetime: CacheLifetime) {
        self.inner.write().await.lifetime = lifetime;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn minutes(n: u64) -> CacheLifetime {
        CacheLifetime::After(Duration::from_secs(n * 60))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = ExpiringCache::new(minutes(5));
        cache.put("github", vec![1, 2]).await;
        assert_eq!(cache.get("github").await, Some(vec![1, 2]));
        assert_eq!(cache.get("gitlab").await, None);
    }

    #[tokio::test]
    async fn test_keys_are_case_insensitive() {
        let cache = ExpiringCache::new(minutes(5));
        cache.put("Foo", 1).await;
        assert_eq!(cache.get("foo").await, Some(1));
        assert_eq!(cache.get("  FOO ").await, Some(1));

        cache.put("foo", 2).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("Foo").await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_are_absent() {
        let cache = ExpiringCache::new(minutes(1));
        cache.put("git", "cached").await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get("git").await, Some("cached"));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(cache.get("git").await, None);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_expired() {
        let cache = ExpiringCache::new(minutes(1));
        cache.put("old", 1).await;
        tokio::time::advance(Duration::from_secs(45)).await;
        cache.put("new", 2).await;
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(cache.sweep_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("new").await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_expiring_entries_survive_until_clear() {
        let cache = ExpiringCache::new(CacheLifetime::Never);
        cache.put("svelte", 1).await;

        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
        assert_eq!(cache.sweep_expired().await, 0);
        assert_eq!(cache.get("svelte").await, Some(1));

        cache.clear().await;
        assert!(cache.is_empty().await);
        assert_eq!(cache.get("svelte").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_lifetime_applies_to_existing_entries() {
        let cache = ExpiringCache::new(CacheLifetime::Never);
        cache.put("rust", 1).await;
        tokio::time::advance(Duration::from_secs(120)).await;

        cache.set_lifetime(minutes(1)).await;
        assert_eq!(cache.lifetime().await, minutes(1));
        assert_eq!(cache.get("rust").await, None);
    }
}
