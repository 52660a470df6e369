//! Ports implemented by the infrastructure crates

mod cache;
mod repositories;

pub use cache::{Cache, CacheExt};
pub use repositories::{
    RepoResult, StatusRepository, SuggestionRepository, SuggestionTransaction, UserRepository,
};
