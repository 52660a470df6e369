//! # suggestion-db
//!
//! Persistence layer implementing the repository traits from `suggestion-core`.
//!
//! ## Overview
//!
//! - Connection pool management and schema bootstrap for PostgreSQL
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repositories, including the suggestion/user transaction
//! - An in-memory store with the same semantics, used by tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use suggestion_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use suggestion_db::repositories::PgSuggestionRepository;
//! use suggestion_core::traits::SuggestionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let suggestions = PgSuggestionRepository::new(pool);
//!
//!     let active = suggestions.find_active().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{FailPoint, InMemoryStore};
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgStatusRepository, PgSuggestionRepository, PgSuggestionTransaction, PgUserRepository,
};
