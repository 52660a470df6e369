//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CacheBackend, CacheConfig, ConfigError, DatabaseConfig, Environment,
    RedisConfig,
};
