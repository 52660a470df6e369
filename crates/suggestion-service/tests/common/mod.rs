//! Shared fixtures for the service tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use suggestion_cache::MemoryCache;
use suggestion_common::{try_init_tracing_with_config, TracingConfig};
use suggestion_core::entities::{Suggestion, User};
use suggestion_core::error::DomainError;
use suggestion_core::traits::{Cache, RepoResult, SuggestionRepository, UserRepository};
use suggestion_db::InMemoryStore;
use suggestion_service::{ServiceContext, ServiceContextBuilder};

/// In-memory store, the cache the services see, and the wired context
pub struct Fixture {
    pub store: InMemoryStore,
    pub cache: MemoryCache,
    pub ctx: ServiceContext,
}

/// Route service logs through the test writer; later calls are no-ops
fn init_logging() {
    let _ = try_init_tracing_with_config(TracingConfig::test());
}

impl Fixture {
    pub fn new() -> Self {
        init_logging();
        let store = InMemoryStore::new();
        let cache = MemoryCache::new();
        let ctx = ServiceContextBuilder::new()
            .in_memory(&store)
            .cache(Arc::new(cache.clone()))
            .build()
            .expect("context");
        Self { store, cache, ctx }
    }

    /// Context over the same store whose cache always fails
    pub fn with_broken_cache() -> Self {
        init_logging();
        let store = InMemoryStore::new();
        let ctx = ServiceContextBuilder::new()
            .in_memory(&store)
            .cache(Arc::new(BrokenCache))
            .build()
            .expect("context");
        Self {
            store,
            cache: MemoryCache::new(),
            ctx,
        }
    }

    pub async fn add_user(&self, display_name: &str) -> User {
        let user = User::new(
            format!("oid-{display_name}"),
            display_name,
            format!("{display_name}@example.com"),
        );
        self.store.user_repository().create(&user).await.unwrap();
        user
    }

    pub async fn user(&self, id: &str) -> User {
        self.store
            .user_repository()
            .find_by_id(id)
            .await
            .unwrap()
            .expect("user exists")
    }

    pub async fn stored_suggestion(&self, id: &str) -> Option<Suggestion> {
        self.store
            .suggestion_repository()
            .find_by_id(id)
            .await
            .unwrap()
    }

    /// Insert a suggestion directly, bypassing the services
    pub async fn put_suggestion(&self, suggestion: &Suggestion) {
        let mut tx = self.store.suggestion_repository().begin().await.unwrap();
        tx.insert_suggestion(suggestion).await.unwrap();
        tx.commit().await.unwrap();
    }
}

pub fn suggestion_by(author: &User, title: &str) -> Suggestion {
    Suggestion::new(title, format!("{title} please"), author.as_author())
}

/// Cache that fails every call
pub struct BrokenCache;

#[async_trait]
impl Cache for BrokenCache {
    async fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Err(DomainError::CacheError("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> RepoResult<()> {
        Err(DomainError::CacheError("connection refused".to_string()))
    }

    async fn remove(&self, _key: &str) -> RepoResult<()> {
        Err(DomainError::CacheError("connection refused".to_string()))
    }
}
