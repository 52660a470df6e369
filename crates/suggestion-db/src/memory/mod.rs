//! In-memory repositories backed by a shared `InMemoryStore`

mod repositories;
mod store;
mod transaction;

pub use repositories::{
    InMemoryStatusRepository, InMemorySuggestionRepository, InMemoryUserRepository,
};
pub use store::{FailPoint, InMemoryStore};
pub use transaction::InMemoryTransaction;
