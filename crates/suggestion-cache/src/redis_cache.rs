//! Redis-backed implementation of the cache port

use std::time::Duration;

use async_trait::async_trait;

use suggestion_core::error::DomainError;
use suggestion_core::traits::{Cache, RepoResult};

use crate::pool::{RedisPool, RedisPoolError};

impl From<RedisPoolError> for DomainError {
    fn from(err: RedisPoolError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}

/// Cache shared between processes through Redis.
///
/// Keys are stored as given, optionally under a namespace prefix, with the
/// TTL applied by Redis itself.
#[derive(Debug, Clone)]
pub struct RedisCache {
    pool: RedisPool,
    prefix: Option<String>,
}

impl RedisCache {
    /// Create a cache over `pool`
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool, prefix: None }
    }

    /// Store every key under `prefix:`
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.pool.get_string(&self.key(key)).await?)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> RepoResult<()> {
        let key = self.key(key);
        self.pool.set_string(&key, &value, ttl).await?;
        tracing::trace!(key = %key, ttl_ms = ttl.as_millis() as u64, "Cached value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> RepoResult<()> {
        self.pool.delete(&self.key(key)).await?;
        Ok(())
    }
}
