//! PostgreSQL transaction spanning the suggestions and users tables

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use suggestion_core::entities::{Suggestion, User};
use suggestion_core::traits::{RepoResult, SuggestionTransaction};

use super::error::map_db_error;
use super::suggestion::{find_suggestion, insert_suggestion, replace_suggestion};
use super::user::{find_user, replace_user};

/// A started PostgreSQL transaction
///
/// Suggestions and users read through the transaction are locked
/// (`FOR UPDATE`) until commit or rollback, so two upvotes on the same
/// suggestion, or by the same user, run one after the other. Every statement
/// runs on the transaction's own connection. Dropping without commit rolls back.
pub struct PgSuggestionTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgSuggestionTransaction {
    /// Start a transaction on a pooled connection
    pub async fn begin(pool: &PgPool) -> RepoResult<Self> {
        let tx = pool.begin().await.map_err(map_db_error)?;
        Ok(Self { tx })
    }
}

#[async_trait]
impl SuggestionTransaction for PgSuggestionTransaction {
    #[instrument(skip(self))]
    async fn find_suggestion(&mut self, id: &str) -> RepoResult<Option<Suggestion>> {
        find_suggestion(&mut *self.tx, id, true).await
    }

    #[instrument(skip(self))]
    async fn find_user(&mut self, id: &str) -> RepoResult<Option<User>> {
        find_user(&mut *self.tx, id, true).await
    }

    #[instrument(skip(self, suggestion), fields(suggestion_id = %suggestion.id))]
    async fn insert_suggestion(&mut self, suggestion: &Suggestion) -> RepoResult<()> {
        insert_suggestion(&mut *self.tx, suggestion).await
    }

    #[instrument(skip(self, suggestion), fields(suggestion_id = %suggestion.id))]
    async fn replace_suggestion(&mut self, suggestion: &Suggestion) -> RepoResult<()> {
        replace_suggestion(&mut *self.tx, suggestion).await
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn replace_user(&mut self, user: &User) -> RepoResult<()> {
        replace_user(&mut *self.tx, user).await
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }

    async fn abort(self: Box<Self>) -> RepoResult<()> {
        self.tx.rollback().await.map_err(map_db_error)
    }
}
