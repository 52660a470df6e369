//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use suggestion_core::error::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "suggestion not found" error
pub fn suggestion_not_found(id: &str) -> DomainError {
    DomainError::SuggestionNotFound(id.to_string())
}

/// Create a "user not found" error
pub fn user_not_found(id: &str) -> DomainError {
    DomainError::UserNotFound(id.to_string())
}

/// Create a version conflict error
pub fn version_conflict(collection: &'static str, id: &str, expected: i64) -> DomainError {
    DomainError::VersionConflict {
        collection,
        id: id.to_string(),
        expected,
    }
}
