//! In-process response cache with a fixed time-to-live.
//!
//! Upstream APIs are rate limited and their data changes slowly, so adapters
//! keep successful responses for up to `ttl`. Failed fetches are never cached;
//! the next request simply tries again.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Default time-to-live for cached upstream responses (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// A small TTL cache shared between clones of an adapter.
#[derive(Clone)]
pub struct ResponseCache<K, V> {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<K, (Instant, V)>>>,
}

impl<K, V> ResponseCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return the cached value for `key` if it is younger than the TTL.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    /// Store a value, replacing whatever was there.
    pub async fn insert(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache: ResponseCache<u32, Vec<String>> = ResponseCache::new(DEFAULT_TTL);
        cache.insert(1, vec!["a".to_string()]).await;

        assert_eq!(cache.get(&1).await, Some(vec!["a".to_string()]));
        assert_eq!(cache.get(&2).await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_caching() {
        let cache: ResponseCache<u32, u32> = ResponseCache::new(Duration::ZERO);
        cache.insert(1, 42).await;

        assert_eq!(cache.get(&1).await, None);
    }

    #[tokio::test]
    async fn test_entry_expires() {
        let cache: ResponseCache<&'static str, u32> =
            ResponseCache::new(Duration::from_millis(20));
        cache.insert("k", 7).await;
        assert_eq!(cache.get(&"k").await, Some(7));

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get(&"k").await, None);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache: ResponseCache<u32, u32> = ResponseCache::new(DEFAULT_TTL);
        let clone = cache.clone();
        clone.insert(3, 9).await;

        assert_eq!(cache.get(&3).await, Some(9));
    }
}
