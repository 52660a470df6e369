//! Database models - SQLx-compatible structs for PostgreSQL tables

mod status;
mod suggestion;
mod user;

pub use status::StatusModel;
pub use suggestion::SuggestionModel;
pub use user::UserModel;
