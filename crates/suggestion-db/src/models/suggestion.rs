//! Suggestion database model

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use suggestion_core::entities::{Status, SuggestionAuthor};

/// Database model for suggestions table
///
/// Embedded documents (author, status) are stored as JSONB; the vote set is a
/// `TEXT[]` kept sorted and free of duplicates.
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionModel {
    pub id: String,
    pub suggestion: String,
    pub description: String,
    pub date_created: DateTime<Utc>,
    pub author: Json<SuggestionAuthor>,
    pub user_votes: Vec<String>,
    pub suggestion_status: Option<Json<Status>>,
    pub owner_notes: String,
    pub approved_for_release: bool,
    pub archived: bool,
    pub rejected: bool,
    pub version: i64,
}
