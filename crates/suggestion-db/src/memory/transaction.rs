//! In-memory transaction with staged writes and an optimistic commit

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use suggestion_core::entities::{Suggestion, User};
use suggestion_core::error::DomainError;
use suggestion_core::traits::{RepoResult, SuggestionTransaction};

use super::store::{next_version, FailPoint, InMemoryStore, SUGGESTIONS, USERS};

/// A staged write and the committed version it was based on.
/// `base` is `None` for inserts.
struct Staged<T> {
    doc: T,
    base: Option<i64>,
}

/// Transaction over an `InMemoryStore`.
///
/// Writes are buffered until `commit`, which re-checks every base version
/// under the store lock and then applies all of them at once.
pub struct InMemoryTransaction {
    store: InMemoryStore,
    suggestions: HashMap<String, Staged<Suggestion>>,
    users: HashMap<String, Staged<User>>,
}

impl InMemoryTransaction {
    pub(super) fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            suggestions: HashMap::new(),
            users: HashMap::new(),
        }
    }

    fn committed_suggestion(&self, id: &str) -> Option<Suggestion> {
        self.store
            .with_data(|data| data.suggestions.get(id).cloned())
    }

    fn committed_user(&self, id: &str) -> Option<User> {
        self.store.with_data(|data| data.users.get(id).cloned())
    }

    fn committed_user_version(&self, id: &str) -> Option<i64> {
        self.store
            .with_data(|data| data.users.get(id).map(|u| u.version))
    }
}

#[async_trait]
impl SuggestionTransaction for InMemoryTransaction {
    async fn find_suggestion(&mut self, id: &str) -> RepoResult<Option<Suggestion>> {
        if let Some(staged) = self.suggestions.get(id) {
            return Ok(Some(staged.doc.clone()));
        }
        Ok(self.committed_suggestion(id))
    }

    async fn find_user(&mut self, id: &str) -> RepoResult<Option<User>> {
        if let Some(staged) = self.users.get(id) {
            return Ok(Some(staged.doc.clone()));
        }
        Ok(self.committed_user(id))
    }

    async fn insert_suggestion(&mut self, suggestion: &Suggestion) -> RepoResult<()> {
        self.store.check_fail_point(FailPoint::SuggestionWrite)?;

        if self.suggestions.contains_key(&suggestion.id)
            || self.committed_suggestion(&suggestion.id).is_some()
        {
            return Err(DomainError::AlreadyExists(suggestion.id.clone()));
        }

        self.suggestions.insert(
            suggestion.id.clone(),
            Staged {
                doc: suggestion.clone(),
                base: None,
            },
        );
        Ok(())
    }

    async fn replace_suggestion(&mut self, suggestion: &Suggestion) -> RepoResult<()> {
        self.store.check_fail_point(FailPoint::SuggestionWrite)?;

        let (current, base) = match self.suggestions.get(&suggestion.id) {
            Some(staged) => (Some(staged.doc.version), staged.base),
            None => {
                let committed = self.committed_suggestion(&suggestion.id).map(|s| s.version);
                (committed, committed)
            }
        };
        let version = next_version(SUGGESTIONS, &suggestion.id, current, suggestion.version)?;

        let mut doc = suggestion.clone();
        // an insert staged in this transaction stays an insert
        if base.is_some() {
            doc.version = version;
        }
        self.suggestions
            .insert(doc.id.clone(), Staged { doc, base });
        Ok(())
    }

    async fn replace_user(&mut self, user: &User) -> RepoResult<()> {
        self.store.check_fail_point(FailPoint::UserWrite)?;

        let (current, base) = match self.users.get(&user.id) {
            Some(staged) => (Some(staged.doc.version), staged.base),
            None => {
                let committed = self.committed_user_version(&user.id);
                (committed, committed)
            }
        };
        let version = next_version(USERS, &user.id, current, user.version)?;

        let mut doc = user.clone();
        doc.version = version;
        self.users.insert(doc.id.clone(), Staged { doc, base });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let Self {
            store,
            suggestions,
            users,
        } = *self;

        store.with_data(|data| {
            for (id, staged) in &suggestions {
                let stored = data.suggestions.get(id).map(|s| s.version);
                match (staged.base, stored) {
                    (None, Some(_)) => return Err(DomainError::AlreadyExists(id.clone())),
                    (Some(base), Some(v)) if v == base => {}
                    (Some(base), _) => {
                        return Err(DomainError::VersionConflict {
                            collection: SUGGESTIONS,
                            id: id.clone(),
                            expected: base,
                        })
                    }
                    (None, None) => {}
                }
            }
            for (id, staged) in &users {
                let stored = data.users.get(id).map(|u| u.version);
                if let Some(base) = staged.base {
                    if stored != Some(base) {
                        return Err(DomainError::VersionConflict {
                            collection: USERS,
                            id: id.clone(),
                            expected: base,
                        });
                    }
                }
            }

            debug!(
                suggestions = suggestions.len(),
                users = users.len(),
                "Committing in-memory transaction"
            );
            for (id, staged) in suggestions {
                data.suggestions.insert(id, staged.doc);
            }
            for (id, staged) in users {
                data.users.insert(id, staged.doc);
            }
            Ok(())
        })
    }

    async fn abort(self: Box<Self>) -> RepoResult<()> {
        debug!(
            suggestions = self.suggestions.len(),
            users = self.users.len(),
            "Discarding in-memory transaction"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suggestion_core::traits::{SuggestionRepository, UserRepository};

    async fn seeded() -> (InMemoryStore, User, Suggestion) {
        let store = InMemoryStore::new();
        let user = User::new("oid-1", "Tim", "tim@example.com");
        store.user_repository().create(&user).await.unwrap();

        let suggestion = Suggestion::new("Dark mode", "", user.as_author());
        let mut tx = store.suggestion_repository().begin().await.unwrap();
        tx.insert_suggestion(&suggestion).await.unwrap();
        tx.commit().await.unwrap();

        (store, user, suggestion)
    }

    #[tokio::test]
    async fn test_writes_invisible_until_commit() {
        let (store, user, suggestion) = seeded().await;
        let repo = store.suggestion_repository();

        let mut tx = repo.begin().await.unwrap();
        let mut loaded = tx.find_suggestion(&suggestion.id).await.unwrap().unwrap();
        loaded.toggle_vote(&user.id);
        tx.replace_suggestion(&loaded).await.unwrap();

        let seen_inside = tx.find_suggestion(&suggestion.id).await.unwrap().unwrap();
        assert!(seen_inside.has_vote(&user.id));

        let seen_outside = repo.find_by_id(&suggestion.id).await.unwrap().unwrap();
        assert!(!seen_outside.has_vote(&user.id));

        tx.commit().await.unwrap();
        let committed = repo.find_by_id(&suggestion.id).await.unwrap().unwrap();
        assert!(committed.has_vote(&user.id));
        assert_eq!(committed.version, suggestion.version + 1);
    }

    #[tokio::test]
    async fn test_abort_discards() {
        let (store, user, suggestion) = seeded().await;
        let repo = store.suggestion_repository();

        let mut tx = repo.begin().await.unwrap();
        let mut loaded = tx.find_suggestion(&suggestion.id).await.unwrap().unwrap();
        loaded.toggle_vote(&user.id);
        tx.replace_suggestion(&loaded).await.unwrap();
        tx.abort().await.unwrap();

        let stored = repo.find_by_id(&suggestion.id).await.unwrap().unwrap();
        assert!(stored.user_votes.is_empty());
        assert_eq!(stored.version, suggestion.version);
    }

    #[tokio::test]
    async fn test_commit_detects_concurrent_write() {
        let (store, user, suggestion) = seeded().await;
        let repo = store.suggestion_repository();

        let mut first = repo.begin().await.unwrap();
        let mut second = repo.begin().await.unwrap();

        let mut a = first.find_suggestion(&suggestion.id).await.unwrap().unwrap();
        let mut b = second.find_suggestion(&suggestion.id).await.unwrap().unwrap();
        a.toggle_vote(&user.id);
        b.toggle_vote("someone-else");
        first.replace_suggestion(&a).await.unwrap();
        second.replace_suggestion(&b).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(err.is_conflict());

        let stored = repo.find_by_id(&suggestion.id).await.unwrap().unwrap();
        assert!(stored.has_vote(&user.id));
        assert!(!stored.has_vote("someone-else"));
    }

    #[tokio::test]
    async fn test_insert_existing_rejected() {
        let (store, _, suggestion) = seeded().await;
        let mut tx = store.suggestion_repository().begin().await.unwrap();

        let err = tx.insert_suggestion(&suggestion).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_replace_user_unknown() {
        let store = InMemoryStore::new();
        let mut tx = store.suggestion_repository().begin().await.unwrap();
        let ghost = User::new("oid-x", "Ghost", "ghost@example.com");

        let err = tx.replace_user(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_find_user_sees_staged_copy() {
        let (store, user, suggestion) = seeded().await;
        let mut tx = store.suggestion_repository().begin().await.unwrap();

        let mut voter = tx.find_user(&user.id).await.unwrap().unwrap();
        assert_eq!(voter.version, user.version);
        voter.add_vote(suggestion.to_basic());
        tx.replace_user(&voter).await.unwrap();

        let staged = tx.find_user(&user.id).await.unwrap().unwrap();
        assert_eq!(staged.voted_on_suggestions.len(), 1);
        assert_eq!(staged.version, user.version + 1);
        assert!(tx.find_user("missing").await.unwrap().is_none());

        let outside = store
            .user_repository()
            .find_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(outside.voted_on_suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_user_write_fail_point() {
        let (store, user, _) = seeded().await;
        store.fail_next(FailPoint::UserWrite);

        let mut tx = store.suggestion_repository().begin().await.unwrap();
        assert!(tx.replace_user(&user).await.is_err());
        tx.replace_user(&user).await.unwrap();
        tx.commit().await.unwrap();

        let stored = store
            .user_repository()
            .find_by_id(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, user.version + 1);
    }
}
