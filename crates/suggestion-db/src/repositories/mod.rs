//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in suggestion-core.
//! Each repository handles database operations for a specific collection.

mod error;
mod status;
mod suggestion;
mod transaction;
mod user;

pub use status::PgStatusRepository;
pub use suggestion::PgSuggestionRepository;
pub use transaction::PgSuggestionTransaction;
pub use user::PgUserRepository;
