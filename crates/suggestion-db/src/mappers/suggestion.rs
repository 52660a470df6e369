//! Suggestion entity <-> model mapper

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use suggestion_core::entities::{Status, Suggestion, SuggestionAuthor};

use crate::models::SuggestionModel;

/// Convert SuggestionModel to Suggestion entity
impl From<SuggestionModel> for Suggestion {
    fn from(model: SuggestionModel) -> Self {
        Suggestion {
            id: model.id,
            suggestion: model.suggestion,
            description: model.description,
            date_created: model.date_created,
            author: model.author.0,
            user_votes: model.user_votes.into_iter().collect(),
            suggestion_status: model.suggestion_status.map(|s| s.0),
            owner_notes: model.owner_notes,
            approved_for_release: model.approved_for_release,
            archived: model.archived,
            rejected: model.rejected,
            version: model.version,
        }
    }
}

/// Suggestion entity reference prepared for binding
pub struct SuggestionWrite<'a> {
    pub id: &'a str,
    pub suggestion: &'a str,
    pub description: &'a str,
    pub date_created: DateTime<Utc>,
    pub author: Json<&'a SuggestionAuthor>,
    pub user_votes: Vec<String>,
    pub suggestion_status: Option<Json<&'a Status>>,
    pub owner_notes: &'a str,
    pub approved_for_release: bool,
    pub archived: bool,
    pub rejected: bool,
    pub version: i64,
}

impl<'a> SuggestionWrite<'a> {
    pub fn new(suggestion: &'a Suggestion) -> Self {
        Self {
            id: &suggestion.id,
            suggestion: &suggestion.suggestion,
            description: &suggestion.description,
            date_created: suggestion.date_created,
            author: Json(&suggestion.author),
            // BTreeSet iteration keeps the array sorted
            user_votes: suggestion.user_votes.iter().cloned().collect(),
            suggestion_status: suggestion.suggestion_status.as_ref().map(Json),
            owner_notes: &suggestion.owner_notes,
            approved_for_release: suggestion.approved_for_release,
            archived: suggestion.archived,
            rejected: suggestion.rejected,
            version: suggestion.version,
        }
    }
}
