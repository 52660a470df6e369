//! Cache access shared by the services
//!
//! The cache only saves reads. A failed lookup counts as a miss and a failed
//! write or removal is logged, so callers never see a cache error.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use suggestion_core::traits::{Cache, CacheExt};
use tracing::{debug, warn};

/// Cached value under `key`, if any
pub(super) async fn lookup<T>(cache: &dyn Cache, key: &str) -> Option<T>
where
    T: DeserializeOwned + Send,
{
    match cache.get_json::<T>(key).await {
        Ok(Some(value)) => {
            debug!(key, "Cache hit");
            Some(value)
        }
        Ok(None) => {
            debug!(key, "Cache miss");
            None
        }
        Err(e) => {
            warn!(key, error = %e, "Cache read failed, treating as miss");
            None
        }
    }
}

/// Store `value` under `key` for `ttl`
pub(super) async fn store<T>(cache: &dyn Cache, key: &str, value: &T, ttl: Duration)
where
    T: Serialize + Sync,
{
    if let Err(e) = cache.set_json(key, value, ttl).await {
        warn!(key, error = %e, "Failed to populate cache");
    }
}

/// Drop `key` so the next read goes to the database
pub(super) async fn invalidate(cache: &dyn Cache, key: &str) {
    match cache.remove(key).await {
        Ok(()) => debug!(key, "Cache entry invalidated"),
        Err(e) => warn!(key, error = %e, "Failed to invalidate cache entry"),
    }
}
