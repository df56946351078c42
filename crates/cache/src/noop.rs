//! Always-miss cache backend.

use async_trait::async_trait;

use crate::{Cache, CacheError};

/// A cache that stores nothing. Used when no `REDIS_URL` is configured and
/// in tests that should not depend on caching.
#[derive(Debug, Default, Clone)]
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
