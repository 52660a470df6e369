//! # suggestion-cache
//!
//! Implementations of the `Cache` port from `suggestion-core`.
//!
//! ## Features
//!
//! - **MemoryCache**: process-local map with per-entry expiry
//! - **RedisCache**: shared cache on a deadpool-managed Redis pool
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use suggestion_cache::{RedisCache, RedisPool, RedisPoolConfig};
//! use suggestion_core::CacheExt;
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let cache = RedisCache::new(pool);
//!
//! cache.set_json("StatusData", &statuses, Duration::from_secs(86_400)).await?;
//! let cached: Option<Vec<Status>> = cache.get_json("StatusData").await?;
//! ```

pub mod memory;
pub mod pool;
pub mod redis_cache;

pub use memory::MemoryCache;
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use redis_cache::RedisCache;
