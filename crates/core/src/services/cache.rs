//! Memoized reads over a [`CacheStore`].
//!
//! Reads are cached for a fixed TTL under one or more tags. Writers call
//! [`ContentCache::invalidate`] with the tags their change affects. Cache
//! failures never fail a request: they are logged and the loader runs.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use folio_common::{AppResult, CacheStore, MemoryCacheStore};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

/// Tag for post listings and aggregates.
pub const TAG_POSTS: &str = "posts";
/// Tag for category listings.
pub const TAG_CATEGORIES: &str = "categories";
/// Tag for both link kinds.
pub const TAG_LINKS: &str = "links";
/// Tag for project listings.
pub const TAG_PROJECTS: &str = "projects";
/// Tag for HTML module listings.
pub const TAG_MODULES: &str = "modules";

/// Tag for a single post and its comments.
#[must_use]
pub fn post_tag(slug: &str) -> String {
    format!("post:{slug}")
}

/// TTL of post listings.
pub const TTL_POSTS: Duration = Duration::from_secs(60);
/// TTL of a single post.
pub const TTL_POST: Duration = Duration::from_secs(120);
/// TTL of projects and modules.
pub const TTL_SHOWCASE: Duration = Duration::from_secs(300);
/// TTL of rarely edited content (categories, links).
pub const TTL_STATIC: Duration = Duration::from_secs(600);

/// Tag-invalidated read cache.
#[derive(Clone)]
pub struct ContentCache {
    store: Arc<dyn CacheStore>,
}

impl ContentCache {
    /// Create a cache over a store.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Create a cache over a fresh in-process store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCacheStore::new()))
    }

    /// Return the cached value for `key` or run `load` and cache its result.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: &str,
        tags: &[String],
        ttl: Duration,
        load: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => return Ok(value),
                Err(e) => warn!(key = %key, error = %e, "Discarding undecodable cache entry"),
            },
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Cache read failed"),
        }

        let value = load().await?;

        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(e) = self.store.set(key, raw, ttl, tags).await {
                    warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to encode cache entry"),
        }

        Ok(value)
    }

    /// Drop everything cached under the given tags.
    pub async fn invalidate(&self, tags: &[&str]) {
        for tag in tags {
            if let Err(e) = self.store.invalidate_tag(tag).await {
                warn!(tag = %tag, error = %e, "Cache invalidation failed");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_get_or_load_memoizes_until_invalidated() {
        let cache = ContentCache::in_memory();
        let calls = AtomicUsize::new(0);
        let tags = [TAG_POSTS.to_string()];

        for _ in 0..2 {
            let value: Vec<String> = cache
                .get_or_load("posts:list", &tags, TTL_POSTS, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["hello".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, ["hello"]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate(&[TAG_POSTS]).await;

        let _: Vec<String> = cache
            .get_or_load("posts:list", &tags, TTL_POSTS, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![])
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_errors_are_not_cached() {
        let cache = ContentCache::in_memory();

        let first: AppResult<u32> = cache
            .get_or_load("k", &[], TTL_POSTS, || async {
                Err(folio_common::AppError::Database("down".to_string()))
            })
            .await;
        assert!(first.is_err());

        let second: u32 = cache
            .get_or_load("k", &[], TTL_POSTS, || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(second, 7);
    }
}
