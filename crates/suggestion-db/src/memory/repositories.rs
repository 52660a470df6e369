//! In-memory implementations of the repository ports

use async_trait::async_trait;
use tracing::instrument;

use suggestion_core::entities::{Status, Suggestion, User};
use suggestion_core::error::DomainError;
use suggestion_core::traits::{
    RepoResult, StatusRepository, SuggestionRepository, SuggestionTransaction, UserRepository,
};

use super::store::{next_version, FailPoint, InMemoryStore, SUGGESTIONS, USERS};
use super::transaction::InMemoryTransaction;

/// In-memory implementation of StatusRepository
#[derive(Clone)]
pub struct InMemoryStatusRepository {
    store: InMemoryStore,
}

impl InMemoryStatusRepository {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StatusRepository for InMemoryStatusRepository {
    async fn find_all(&self) -> RepoResult<Vec<Status>> {
        self.store.record_status_scan();
        Ok(self.store.with_data(|data| {
            let mut statuses = data.statuses.clone();
            statuses.sort_by(|a, b| a.status_name.cmp(&b.status_name));
            statuses
        }))
    }

    #[instrument(skip(self, status), fields(status_id = %status.id))]
    async fn create(&self, status: &Status) -> RepoResult<()> {
        self.store.with_data(|data| {
            if data.statuses.iter().any(|s| s.id == status.id) {
                return Err(DomainError::AlreadyExists(status.id.clone()));
            }
            data.statuses.push(status.clone());
            Ok(())
        })
    }
}

/// In-memory implementation of SuggestionRepository
#[derive(Clone)]
pub struct InMemorySuggestionRepository {
    store: InMemoryStore,
}

impl InMemorySuggestionRepository {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SuggestionRepository for InMemorySuggestionRepository {
    async fn find_active(&self) -> RepoResult<Vec<Suggestion>> {
        self.store.record_suggestion_scan();
        Ok(self.store.with_data(|data| {
            let mut active: Vec<Suggestion> = data
                .suggestions
                .values()
                .filter(|s| !s.archived)
                .cloned()
                .collect();
            active.sort_by(|a, b| {
                a.date_created
                    .cmp(&b.date_created)
                    .then_with(|| a.id.cmp(&b.id))
            });
            active
        }))
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Suggestion>> {
        Ok(self.store.with_data(|data| data.suggestions.get(id).cloned()))
    }

    #[instrument(skip(self, suggestion), fields(suggestion_id = %suggestion.id))]
    async fn replace(&self, suggestion: &Suggestion) -> RepoResult<()> {
        self.store.check_fail_point(FailPoint::SuggestionWrite)?;
        self.store.with_data(|data| {
            let stored = data.suggestions.get(&suggestion.id).map(|s| s.version);
            let version = next_version(SUGGESTIONS, &suggestion.id, stored, suggestion.version)?;
            let mut doc = suggestion.clone();
            doc.version = version;
            data.suggestions.insert(doc.id.clone(), doc);
            Ok(())
        })
    }

    async fn begin(&self) -> RepoResult<Box<dyn SuggestionTransaction>> {
        Ok(Box::new(InMemoryTransaction::new(self.store.clone())))
    }
}

/// In-memory implementation of UserRepository
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        Ok(self.store.with_data(|data| data.users.get(id).cloned()))
    }

    async fn find_by_object_identifier(
        &self,
        object_identifier: &str,
    ) -> RepoResult<Option<User>> {
        Ok(self.store.with_data(|data| {
            data.users
                .values()
                .find(|u| u.object_identifier == object_identifier)
                .cloned()
        }))
    }

    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.store.with_data(|data| {
            let mut users: Vec<User> = data.users.values().cloned().collect();
            users.sort_by(|a, b| a.display_name.cmp(&b.display_name));
            users
        }))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        self.store.with_data(|data| {
            let taken = data.users.contains_key(&user.id)
                || data
                    .users
                    .values()
                    .any(|u| u.object_identifier == user.object_identifier);
            if taken {
                return Err(DomainError::AlreadyExists(user.id.clone()));
            }
            data.users.insert(user.id.clone(), user.clone());
            Ok(())
        })
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        self.store.check_fail_point(FailPoint::UserWrite)?;
        self.store.with_data(|data| {
            let stored = data.users.get(&user.id).map(|u| u.version);
            let version = next_version(USERS, &user.id, stored, user.version)?;
            let mut doc = user.clone();
            doc.version = version;
            data.users.insert(doc.id.clone(), doc);
            Ok(())
        })
    }
}
