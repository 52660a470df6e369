//! User entity - a suggestion author and voter

use serde::{Deserialize, Serialize};

use super::new_document_id;
use super::suggestion::{BasicSuggestion, SuggestionAuthor};

/// User entity with denormalized suggestion references
///
/// `authored_suggestions` and `voted_on_suggestions` mirror the suggestion
/// side (`Suggestion::author` and `Suggestion::user_votes`). They are only
/// written inside a suggestion transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Identifier issued by the external identity provider
    pub object_identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email_address: String,
    pub authored_suggestions: Vec<BasicSuggestion>,
    pub voted_on_suggestions: Vec<BasicSuggestion>,
    pub version: i64,
}

impl User {
    /// Create a new User with required fields
    pub fn new(
        object_identifier: impl Into<String>,
        display_name: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id: new_document_id(),
            object_identifier: object_identifier.into(),
            first_name: String::new(),
            last_name: String::new(),
            display_name: display_name.into(),
            email_address: email_address.into(),
            authored_suggestions: Vec::new(),
            voted_on_suggestions: Vec::new(),
            version: 0,
        }
    }

    /// Author reference used on suggestions this user creates
    pub fn as_author(&self) -> SuggestionAuthor {
        SuggestionAuthor::new(&self.id, &self.display_name)
    }

    /// Check if the user has a vote reference for a suggestion
    pub fn has_voted_on(&self, suggestion_id: &str) -> bool {
        self.voted_on_suggestions.iter().any(|s| s.id == suggestion_id)
    }

    /// Record authorship; returns false if already recorded
    pub fn add_authored(&mut self, suggestion: BasicSuggestion) -> bool {
        if self.authored_suggestions.iter().any(|s| s.id == suggestion.id) {
            return false;
        }
        self.authored_suggestions.push(suggestion);
        true
    }

    /// Record a vote reference; returns false if already recorded
    pub fn add_vote(&mut self, suggestion: BasicSuggestion) -> bool {
        if self.has_voted_on(&suggestion.id) {
            return false;
        }
        self.voted_on_suggestions.push(suggestion);
        true
    }

    /// Drop a vote reference; returns false if none was recorded
    pub fn remove_vote(&mut self, suggestion_id: &str) -> bool {
        let before = self.voted_on_suggestions.len();
        self.voted_on_suggestions.retain(|s| s.id != suggestion_id);
        self.voted_on_suggestions.len() != before
    }
}
