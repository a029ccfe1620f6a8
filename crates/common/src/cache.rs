//! Tag-invalidated TTL caches.
//!
//! Cached values are serialized JSON strings stored under a key, together
//! with one or more logical tags. Writers invalidate a tag to drop every key
//! stored under it, regardless of remaining TTL.
//!
//! Two stores are provided:
//!
//! - [`MemoryCacheStore`]: per-process, used for single-instance deployments
//!   and tests
//! - [`RedisCacheStore`]: shared between instances

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use fred::clients::Client as RedisClient;
use fred::interfaces::{KeysInterface, SetsInterface};
use fred::types::{Expiration, ExpireOptions};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{AppError, AppResult};

/// Cache storage backend.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a live value.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a value for `ttl`, registering it under each tag.
    async fn set(&self, key: &str, value: String, ttl: Duration, tags: &[String])
    -> AppResult<()>;

    /// Drop every key registered under `tag`.
    async fn invalidate_tag(&self, tag: &str) -> AppResult<()>;
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Default)]
struct MemoryState {
    entries: HashMap<String, MemoryEntry>,
    tags: HashMap<String, HashSet<String>>,
}

/// In-process cache store.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.state
            .read()
            .await
            .entries
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    /// Whether the store holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let state = self.state.read().await;
        Ok(state
            .entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
        tags: &[String],
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let now = Instant::now();
        let MemoryState { entries, tags: index } = &mut *state;
        entries.retain(|_, e| e.expires_at > now);
        index.retain(|_, keys| {
            keys.retain(|k| entries.contains_key(k));
            !keys.is_empty()
        });
        state.entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                expires_at: now + ttl,
            },
        );
        for tag in tags {
            state
                .tags
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
        Ok(())
    }

    async fn invalidate_tag(&self, tag: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(keys) = state.tags.remove(tag) {
            debug!(tag = %tag, keys = keys.len(), "Invalidating cache tag");
            for key in keys {
                state.entries.remove(&key);
            }
        }
        Ok(())
    }
}

/// Redis-backed cache store.
#[derive(Clone)]
pub struct RedisCacheStore {
    redis: Arc<RedisClient>,
    prefix: String,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, prefix: impl Into<String>) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
        }
    }

    fn value_key(&self, key: &str) -> String {
        format!("{}:cache:{key}", self.prefix)
    }

    fn tag_key(&self, tag: &str) -> String {
        format!("{}:tag:{tag}", self.prefix)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.redis
            .get::<Option<String>, _>(self.value_key(key))
            .await
            .map_err(|e| AppError::Cache(e.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
        tags: &[String],
    ) -> AppResult<()> {
        let value_key = self.value_key(key);
        let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1);

        self.redis
            .set::<(), _, _>(
                value_key.clone(),
                value,
                Some(Expiration::EX(secs)),
                None,
                false,
            )
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        // A tag set lives at least as long as the longest entry it names.
        for tag in tags {
            let tag_key = self.tag_key(tag);
            self.redis
                .sadd::<(), _, _>(tag_key.clone(), value_key.clone())
                .await
                .map_err(|e| AppError::Cache(e.to_string()))?;
            self.redis
                .expire::<(), _>(tag_key.clone(), secs, Some(ExpireOptions::NX))
                .await
                .map_err(|e| AppError::Cache(e.to_string()))?;
            self.redis
                .expire::<(), _>(tag_key, secs, Some(ExpireOptions::GT))
                .await
                .map_err(|e| AppError::Cache(e.to_string()))?;
        }
        Ok(())
    }

    async fn invalidate_tag(&self, tag: &str) -> AppResult<()> {
        let tag_key = self.tag_key(tag);
        let mut keys: Vec<String> = self
            .redis
            .smembers(tag_key.clone())
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;
        keys.push(tag_key);

        debug!(tag = %tag, keys = keys.len(), "Invalidating cache tag");
        self.redis
            .del::<(), _>(keys)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_and_get() {
        let store = MemoryCacheStore::new();
        store
            .set("posts:1", "[1]".to_string(), Duration::from_secs(60), &[
                "posts".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(store.get("posts:1").await.unwrap(), Some("[1]".to_string()));
        assert_eq!(store.get("posts:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_entries_expire() {
        let store = MemoryCacheStore::new();
        store
            .set("k", "v".to_string(), Duration::ZERO, &[])
            .await
            .unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_invalidate_tag_only_drops_tagged_keys() {
        let store = MemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store
            .set("a", "1".to_string(), ttl, &["posts".to_string()])
            .await
            .unwrap();
        store
            .set("b", "2".to_string(), ttl, &[
                "posts".to_string(),
                "post:hello".to_string(),
            ])
            .await
            .unwrap();
        store
            .set("c", "3".to_string(), ttl, &["categories".to_string()])
            .await
            .unwrap();

        store.invalidate_tag("posts").await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), None);
        assert_eq!(store.get("c").await.unwrap(), Some("3".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_tag_index_drops_expired_keys() {
        let store = MemoryCacheStore::new();
        let tag = ["posts".to_string()];
        for i in 0..50 {
            store
                .set(&format!("posts:list:{i}"), "[]".to_string(), Duration::ZERO, &tag)
                .await
                .unwrap();
        }
        store
            .set("posts:list:live", "[]".to_string(), Duration::from_secs(60), &tag)
            .await
            .unwrap();

        let state = store.state.read().await;
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.tags["posts"].len(), 1);
        assert!(state.tags["posts"].contains("posts:list:live"));
    }

    #[tokio::test]
    async fn test_memory_tag_index_forgets_empty_tags() {
        let store = MemoryCacheStore::new();
        store
            .set("a", "1".to_string(), Duration::ZERO, &["post:gone".to_string()])
            .await
            .unwrap();
        store
            .set("b", "2".to_string(), Duration::from_secs(60), &[])
            .await
            .unwrap();

        assert!(!store.state.read().await.tags.contains_key("post:gone"));
    }
}
