//! Suggestion entity - a user-submitted idea with approval state and upvotes

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::new_document_id;
use super::status::Status;

/// Maximum length of a suggestion title
pub const MAX_SUGGESTION_LEN: usize = 75;

/// Maximum length of a suggestion description
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Minimal reference to the user who authored a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionAuthor {
    pub id: String,
    pub display_name: String,
}

impl SuggestionAuthor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Suggestion entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Suggestion {
    pub id: String,
    #[validate(length(min = 1, max = 75))]
    pub suggestion: String,
    #[validate(length(max = 500))]
    pub description: String,
    pub date_created: DateTime<Utc>,
    pub author: SuggestionAuthor,
    /// Ids of the users who upvoted; a set, so each user counts once
    pub user_votes: BTreeSet<String>,
    pub suggestion_status: Option<Status>,
    pub owner_notes: String,
    pub approved_for_release: bool,
    pub archived: bool,
    pub rejected: bool,
    /// Stored document version, bumped on every replace
    pub version: i64,
}

/// Outcome of toggling a user's vote on a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteToggle {
    /// The user had not voted; the vote was recorded
    Added,
    /// The user had voted; the vote was withdrawn
    Removed,
}

impl Suggestion {
    /// Create a new Suggestion awaiting review
    pub fn new(
        suggestion: impl Into<String>,
        description: impl Into<String>,
        author: SuggestionAuthor,
    ) -> Self {
        Self {
            id: new_document_id(),
            suggestion: suggestion.into(),
            description: description.into(),
            date_created: Utc::now(),
            author,
            user_votes: BTreeSet::new(),
            suggestion_status: None,
            owner_notes: String::new(),
            approved_for_release: false,
            archived: false,
            rejected: false,
            version: 0,
        }
    }

    /// Approved for release to the public list; a rejection overrides the flag
    #[inline]
    pub fn is_approved(&self) -> bool {
        self.approved_for_release && !self.rejected
    }

    /// Neither approved nor rejected yet
    #[inline]
    pub fn is_waiting_for_approval(&self) -> bool {
        !self.approved_for_release && !self.rejected
    }

    /// Number of distinct upvoters
    #[inline]
    pub fn vote_count(&self) -> usize {
        self.user_votes.len()
    }

    /// Check whether a user has upvoted this suggestion
    pub fn has_vote(&self, user_id: &str) -> bool {
        self.user_votes.contains(user_id)
    }

    /// Add the user's vote if absent, remove it if present
    pub fn toggle_vote(&mut self, user_id: &str) -> VoteToggle {
        if self.user_votes.insert(user_id.to_string()) {
            VoteToggle::Added
        } else {
            self.user_votes.remove(user_id);
            VoteToggle::Removed
        }
    }

    /// Approve for release (clears a previous rejection)
    pub fn approve(&mut self) {
        self.approved_for_release = true;
        self.rejected = false;
    }

    /// Reject (clears a previous approval)
    pub fn reject(&mut self) {
        self.rejected = true;
        self.approved_for_release = false;
    }

    /// Lightweight reference for embedding in user documents
    pub fn to_basic(&self) -> BasicSuggestion {
        BasicSuggestion::from(self)
    }
}

/// Lightweight projection of a suggestion stored inside user documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicSuggestion {
    pub id: String,
    pub suggestion: String,
}

impl From<&Suggestion> for BasicSuggestion {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            id: suggestion.id.clone(),
            suggestion: suggestion.suggestion.clone(),
        }
    }
}
