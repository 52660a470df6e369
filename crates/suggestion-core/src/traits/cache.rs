//! Cache port - key/value store with per-key expiry
//!
//! Values are JSON strings so the same port fits a process-local map and a
//! shared Redis instance. The cache is an optimization only; callers must
//! behave correctly on a cold cache.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::repositories::RepoResult;
use crate::error::DomainError;

#[async_trait]
pub trait Cache: Send + Sync {
    /// Get the raw value stored under `key`, if present and not expired
    async fn get(&self, key: &str) -> RepoResult<Option<String>>;

    /// Store `value` under `key` for `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration) -> RepoResult<()>;

    /// Remove `key`; removing an absent key is not an error
    async fn remove(&self, key: &str) -> RepoResult<()>;
}

/// Typed JSON helpers available on every `Cache`
#[async_trait]
pub trait CacheExt: Cache {
    /// Get and deserialize a value; an undecodable entry counts as a miss
    async fn get_json<T>(&self, key: &str) -> RepoResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_str(&raw).ok())
    }

    /// Serialize and store a value
    async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> RepoResult<()>
    where
        T: Serialize + Sync,
    {
        let raw =
            serde_json::to_string(value).map_err(|e| DomainError::CacheError(e.to_string()))?;
        self.set(key, raw, ttl).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}
