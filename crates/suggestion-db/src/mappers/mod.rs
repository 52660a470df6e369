//! Entity to model mappers
//!
//! This module provides conversions between domain entities (suggestion-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Write` structs: Prepare entity data for insert/replace statements

mod status;
mod suggestion;
mod user;

pub use suggestion::SuggestionWrite;
pub use user::UserWrite;
