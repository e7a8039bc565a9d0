//! Key caching with per-entry time-to-live

use crate::limits::{DEFAULT_KEY_CACHE_CAPACITY, DEFAULT_KEY_TTL};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Storage for fetched key material
///
/// Implementations decide what an absent TTL means. The crate never deletes
/// entries; expiry is entirely up to the cache.
#[async_trait]
pub trait KeyCache: Send + Sync {
    /// Look up a cached key
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a key, optionally bounded by a time-to-live
    async fn set(&self, key: String, value: String, ttl: Option<Duration>);
}

#[async_trait]
impl<C: KeyCache + ?Sized> KeyCache for Arc<C> {
    async fn get(&self, key: &str) -> Option<String> {
        (**self).get(key).await
    }

    async fn set(&self, key: String, value: String, ttl: Option<Duration>) {
        (**self).set(key, value, ttl).await
    }
}

/// Cached key material together with the lifetime it was stored with
#[derive(Debug, Clone)]
pub(crate) struct CachedKey {
    value: String,
    ttl: Option<Duration>,
}

/// Expires each entry after its own TTL, or the fallback when it has none
struct KeyExpiry {
    fallback_ttl: Duration,
}

impl Expiry<String, CachedKey> for KeyExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedKey,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl.unwrap_or(self.fallback_ttl))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedKey,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl.unwrap_or(self.fallback_ttl))
    }
}

/// In-process key cache backed by moka
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct MokaKeyCache {
    inner: Cache<String, CachedKey>,
}

impl MokaKeyCache {
    /// Create a cache holding at most `max_capacity` keys
    ///
    /// Keys stored without a TTL expire after `fallback_ttl`.
    pub fn new(max_capacity: u64, fallback_ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(KeyExpiry { fallback_ttl })
            .build();

        Self { inner }
    }

    /// Number of cached keys (approximate until pending tasks have run)
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MokaKeyCache {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_CACHE_CAPACITY, DEFAULT_KEY_TTL)
    }
}

#[async_trait]
impl KeyCache for MokaKeyCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.map(|cached| cached.value)
    }

    async fn set(&self, key: String, value: String, ttl: Option<Duration>) {
        self.inner.insert(key, CachedKey { value, ttl }).await;
    }
}
