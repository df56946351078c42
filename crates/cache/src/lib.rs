//! Read-through cache layer.
//!
//! The cache is a latency optimization only: it is never authoritative, and
//! every backend here may be swapped for [`NoopCache`] without changing any
//! observable behaviour other than speed. Mutating services delete affected
//! keys after their database transaction commits; a failed delete is logged
//! and swallowed, never surfaced to the caller.

pub mod keys;
mod memory;
mod noop;
mod redis_backend;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use memory::MemoryCache;
pub use noop::NoopCache;
pub use redis_backend::RedisCache;

/// Default entry lifetime for read-through caching.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Errors a cache backend may produce. These never propagate out of the
/// helper functions below.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A string key-value store with per-entry TTLs.
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch a value. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value with a TTL in seconds.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Read a JSON value from the cache. Backend errors and decode failures are
/// logged and treated as a miss.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "Discarding undecodable cache entry");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(key, error = %err, "Cache read failed; treating as miss");
            None
        }
    }
}

/// Write a JSON value to the cache, best-effort.
pub async fn put_json<T: Serialize>(cache: &dyn Cache, key: &str, value: &T, ttl_secs: u64) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(key, error = %err, "Cache serialization failed; skipping write");
            return;
        }
    };
    if let Err(err) = cache.set(key, &raw, ttl_secs).await {
        tracing::warn!(key, error = %err, "Cache write failed");
    }
}

/// Delete keys, best-effort. Called after a mutation's transaction commits;
/// a failure leaves a stale entry behind until its TTL expires, which is an
/// accepted trade-off.
pub async fn invalidate(cache: &dyn Cache, keys: &[String]) {
    for key in keys {
        if let Err(err) = cache.delete(key).await {
            tracing::warn!(key, error = %err, "Cache invalidation failed");
        }
    }
}
