//! Domain entities - core business objects

mod status;
mod suggestion;
mod user;

pub use status::Status;
pub use suggestion::{
    BasicSuggestion, Suggestion, SuggestionAuthor, VoteToggle, MAX_DESCRIPTION_LEN,
    MAX_SUGGESTION_LEN,
};
pub use user::User;

/// Generate a fresh document id
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
