//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Status not found: {0}")]
    StatusNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    /// The stored document changed since it was read
    #[error("Version conflict on {collection} {id}: expected version {expected}")]
    VersionConflict {
        collection: &'static str,
        id: String,
        expected: i64,
    },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::SuggestionNotFound(_) => "UNKNOWN_SUGGESTION",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::StatusNotFound(_) => "UNKNOWN_STATUS",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Conflict
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SuggestionNotFound(_) | Self::UserNotFound(_) | Self::StatusNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists(_) | Self::VersionConflict { .. })
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::ValidationError(errors.to_string())
    }
}
