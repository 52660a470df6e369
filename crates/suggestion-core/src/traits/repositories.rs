//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Replacing a document is always conditional on
//! the `version` the caller read; the stored version is bumped on success and
//! a mismatch yields `DomainError::VersionConflict`.

use async_trait::async_trait;

use crate::entities::{Status, Suggestion, User};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Status Repository
// ============================================================================

#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// List every status
    async fn find_all(&self) -> RepoResult<Vec<Status>>;

    /// Insert a new status
    async fn create(&self, status: &Status) -> RepoResult<()>;
}

// ============================================================================
// Suggestion Repository
// ============================================================================

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// List all suggestions that are not archived
    async fn find_active(&self) -> RepoResult<Vec<Suggestion>>;

    /// Find suggestion by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Suggestion>>;

    /// Replace a suggestion document (single-document write)
    async fn replace(&self, suggestion: &Suggestion) -> RepoResult<()>;

    /// Open a session and start a transaction spanning suggestions and users
    async fn begin(&self) -> RepoResult<Box<dyn SuggestionTransaction>>;
}

/// A started transaction over the suggestion and user collections.
///
/// Writes are invisible to other readers until `commit`. Dropping the
/// transaction without committing rolls it back.
#[async_trait]
pub trait SuggestionTransaction: Send {
    /// Read a suggestion as seen by this transaction
    async fn find_suggestion(&mut self, id: &str) -> RepoResult<Option<Suggestion>>;

    /// Read a user as seen by this transaction
    async fn find_user(&mut self, id: &str) -> RepoResult<Option<User>>;

    /// Insert a new suggestion document
    async fn insert_suggestion(&mut self, suggestion: &Suggestion) -> RepoResult<()>;

    /// Replace a suggestion document
    async fn replace_suggestion(&mut self, suggestion: &Suggestion) -> RepoResult<()>;

    /// Replace a user document
    async fn replace_user(&mut self, user: &User) -> RepoResult<()>;

    /// Make every write visible atomically
    async fn commit(self: Box<Self>) -> RepoResult<()>;

    /// Discard every write
    async fn abort(self: Box<Self>) -> RepoResult<()>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>>;

    /// Find user by the identity provider's object identifier
    async fn find_by_object_identifier(&self, object_identifier: &str)
        -> RepoResult<Option<User>>;

    /// List every user
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: &User) -> RepoResult<()>;

    /// Replace an existing user document
    async fn update(&self, user: &User) -> RepoResult<()>;
}
