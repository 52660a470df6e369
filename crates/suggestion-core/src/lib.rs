//! # suggestion-core
//!
//! Domain layer for the suggestion tracker: entities, the domain error type,
//! and the repository, transaction and cache ports.
//! This crate has zero dependencies on infrastructure (database, cache server, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    new_document_id, BasicSuggestion, Status, Suggestion, SuggestionAuthor, User, VoteToggle,
};
pub use error::DomainError;
pub use traits::{
    Cache, CacheExt, RepoResult, StatusRepository, SuggestionRepository, SuggestionTransaction,
    UserRepository,
};
