//! InMemoryStore - map-backed collections shared by the in-memory repositories

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use suggestion_core::entities::{Status, Suggestion, User};
use suggestion_core::error::DomainError;
use suggestion_core::traits::RepoResult;

use super::repositories::{
    InMemoryStatusRepository, InMemorySuggestionRepository, InMemoryUserRepository,
};

pub(super) const SUGGESTIONS: &str = "suggestions";
pub(super) const USERS: &str = "users";

/// Which write an injected failure applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// Insert or replace of a suggestion document
    SuggestionWrite,
    /// Replace of a user document
    UserWrite,
}

#[derive(Default)]
pub(super) struct Collections {
    pub statuses: Vec<Status>,
    pub suggestions: HashMap<String, Suggestion>,
    pub users: HashMap<String, User>,
}

#[derive(Default)]
struct Inner {
    data: Mutex<Collections>,
    fail_points: Mutex<HashMap<FailPoint, usize>>,
    status_scans: AtomicUsize,
    suggestion_scans: AtomicUsize,
}

/// In-memory document store for tests and local development.
///
/// Holds the status, suggestion and user collections behind one lock. The
/// repositories handed out by `status_repository`, `suggestion_repository`
/// and `user_repository` all share it. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository over the statuses collection
    pub fn status_repository(&self) -> InMemoryStatusRepository {
        InMemoryStatusRepository::new(self.clone())
    }

    /// Repository over the suggestions collection
    pub fn suggestion_repository(&self) -> InMemorySuggestionRepository {
        InMemorySuggestionRepository::new(self.clone())
    }

    /// Repository over the users collection
    pub fn user_repository(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.clone())
    }

    /// Make the next write at `point` fail with a database error
    pub fn fail_next(&self, point: FailPoint) {
        *self.inner.fail_points.lock().entry(point).or_insert(0) += 1;
    }

    /// Number of full status scans served
    pub fn status_scans(&self) -> usize {
        self.inner.status_scans.load(Ordering::SeqCst)
    }

    /// Number of active-suggestion scans served
    pub fn suggestion_scans(&self) -> usize {
        self.inner.suggestion_scans.load(Ordering::SeqCst)
    }

    pub(super) fn record_status_scan(&self) {
        self.inner.status_scans.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn record_suggestion_scan(&self) {
        self.inner.suggestion_scans.fetch_add(1, Ordering::SeqCst);
    }

    /// Consume an injected failure for `point`, if one is armed
    pub(super) fn check_fail_point(&self, point: FailPoint) -> RepoResult<()> {
        let mut points = self.inner.fail_points.lock();
        match points.get_mut(&point) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(DomainError::DatabaseError(format!(
                    "injected failure at {point:?}"
                )))
            }
            _ => Ok(()),
        }
    }

    pub(super) fn with_data<R>(&self, f: impl FnOnce(&mut Collections) -> R) -> R {
        let mut data = self.inner.data.lock();
        f(&mut data)
    }
}

/// Check `expected` against the stored version and return the bumped one
pub(super) fn next_version(
    collection: &'static str,
    id: &str,
    stored: Option<i64>,
    expected: i64,
) -> RepoResult<i64> {
    match stored {
        None if collection == USERS => Err(DomainError::UserNotFound(id.to_string())),
        None => Err(DomainError::SuggestionNotFound(id.to_string())),
        Some(v) if v != expected => Err(DomainError::VersionConflict {
            collection,
            id: id.to_string(),
            expected,
        }),
        Some(v) => Ok(v + 1),
    }
}
