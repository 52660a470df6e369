//! Service context - dependency container for services
//!
//! Holds the repositories, the cache and the cache lifetimes needed by services.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use suggestion_cache::{MemoryCache, RedisCache, RedisPool};
use suggestion_common::{AppConfig, CacheBackend, CacheConfig};
use suggestion_core::traits::{Cache, StatusRepository, SuggestionRepository, UserRepository};
use suggestion_db::{
    create_pool, run_migrations, DatabaseConfig, InMemoryStore, PgStatusRepository,
    PgSuggestionRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// How long each cached list lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Lifetime of the status list (24 hours by default)
    pub status_ttl: Duration,
    /// Lifetime of the active suggestion list (1 minute by default)
    pub suggestion_ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for CacheSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            status_ttl: config.status_ttl(),
            suggestion_ttl: config.suggestion_ttl(),
        }
    }
}

/// Service context containing all dependencies
///
/// Every collaborator is passed in explicitly; services borrow the context
/// and never reach for global state.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    status_repo: Arc<dyn StatusRepository>,
    suggestion_repo: Arc<dyn SuggestionRepository>,
    user_repo: Arc<dyn UserRepository>,

    // Cache
    cache: Arc<dyn Cache>,
    cache_settings: CacheSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        status_repo: Arc<dyn StatusRepository>,
        suggestion_repo: Arc<dyn SuggestionRepository>,
        user_repo: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        cache_settings: CacheSettings,
    ) -> Self {
        Self {
            status_repo,
            suggestion_repo,
            user_repo,
            cache,
            cache_settings,
        }
    }

    // === Repositories ===

    /// Get the status repository
    pub fn status_repo(&self) -> &dyn StatusRepository {
        self.status_repo.as_ref()
    }

    /// Get the suggestion repository
    pub fn suggestion_repo(&self) -> &dyn SuggestionRepository {
        self.suggestion_repo.as_ref()
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    // === Cache ===

    /// Get the cache
    pub fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    pub fn cache_settings(&self) -> CacheSettings {
        self.cache_settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("cache", &"dyn Cache")
            .field("cache_settings", &self.cache_settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    status_repo: Option<Arc<dyn StatusRepository>>,
    suggestion_repo: Option<Arc<dyn SuggestionRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    cache: Option<Arc<dyn Cache>>,
    cache_settings: CacheSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            status_repo: None,
            suggestion_repo: None,
            user_repo: None,
            cache: None,
            cache_settings: CacheSettings::default(),
        }
    }

    pub fn status_repo(mut self, repo: Arc<dyn StatusRepository>) -> Self {
        self.status_repo = Some(repo);
        self
    }

    pub fn suggestion_repo(mut self, repo: Arc<dyn SuggestionRepository>) -> Self {
        self.suggestion_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    /// Use the three repositories of an in-memory store
    pub fn in_memory(self, store: &InMemoryStore) -> Self {
        self.status_repo(Arc::new(store.status_repository()))
            .suggestion_repo(Arc::new(store.suggestion_repository()))
            .user_repo(Arc::new(store.user_repository()))
    }

    pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_settings(mut self, settings: CacheSettings) -> Self {
        self.cache_settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// Falls back to a fresh `MemoryCache` when no cache was given.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.status_repo
                .ok_or_else(|| ServiceError::validation("status_repo is required"))?,
            self.suggestion_repo
                .ok_or_else(|| ServiceError::validation("suggestion_repo is required"))?,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.cache.unwrap_or_else(|| Arc::new(MemoryCache::new())),
            self.cache_settings,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Connect to PostgreSQL, apply the schema and select the configured cache
pub async fn create_service_context(config: &AppConfig) -> anyhow::Result<ServiceContext> {
    let db_config = DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .context("Failed to connect to PostgreSQL")?;
    run_migrations(&pool)
        .await
        .context("Failed to apply database schema")?;

    let cache: Arc<dyn Cache> = match config.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Redis => {
            let redis = config
                .cache
                .redis
                .as_ref()
                .context("REDIS_URL is required for the redis cache backend")?;
            let redis_pool =
                RedisPool::from_config(redis).context("Failed to create Redis pool")?;
            Arc::new(RedisCache::new(redis_pool).with_prefix(config.app.name.clone()))
        }
    };

    tracing::info!(
        app = %config.app.name,
        cache_backend = ?config.cache.backend,
        "Service context ready"
    );

    let ctx = ServiceContextBuilder::new()
        .status_repo(Arc::new(PgStatusRepository::new(pool.clone())))
        .suggestion_repo(Arc::new(PgSuggestionRepository::new(pool.clone())))
        .user_repo(Arc::new(PgUserRepository::new(pool)))
        .cache(cache)
        .cache_settings(CacheSettings::from(&config.cache))
        .build()?;

    Ok(ctx)
}
