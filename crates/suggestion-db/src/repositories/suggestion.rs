//! PostgreSQL implementation of SuggestionRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use suggestion_core::entities::Suggestion;
use suggestion_core::error::DomainError;
use suggestion_core::traits::{RepoResult, SuggestionRepository, SuggestionTransaction};

use crate::mappers::SuggestionWrite;
use crate::models::SuggestionModel;

use super::error::{map_db_error, map_unique_violation, suggestion_not_found, version_conflict};
use super::transaction::PgSuggestionTransaction;

const COLLECTION: &str = "suggestions";

/// PostgreSQL implementation of SuggestionRepository
#[derive(Clone)]
pub struct PgSuggestionRepository {
    pool: PgPool,
}

impl PgSuggestionRepository {
    /// Create a new PgSuggestionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionRepository for PgSuggestionRepository {
    #[instrument(skip(self))]
    async fn find_active(&self) -> RepoResult<Vec<Suggestion>> {
        let results = sqlx::query_as::<_, SuggestionModel>(
            r"
            SELECT id, suggestion, description, date_created, author, user_votes,
                   suggestion_status, owner_notes, approved_for_release, archived, rejected,
                   version
            FROM suggestions
            WHERE archived = FALSE
            ORDER BY date_created
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Suggestion::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Suggestion>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        find_suggestion(&mut conn, id, false).await
    }

    #[instrument(skip(self, suggestion), fields(suggestion_id = %suggestion.id))]
    async fn replace(&self, suggestion: &Suggestion) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        replace_suggestion(&mut conn, suggestion).await
    }

    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn SuggestionTransaction>> {
        let tx = PgSuggestionTransaction::begin(&self.pool).await?;
        Ok(Box::new(tx))
    }
}

/// Select one suggestion, optionally locking the row until the transaction ends
pub(super) async fn find_suggestion(
    conn: &mut PgConnection,
    id: &str,
    for_update: bool,
) -> RepoResult<Option<Suggestion>> {
    let sql = if for_update {
        r"
        SELECT id, suggestion, description, date_created, author, user_votes,
               suggestion_status, owner_notes, approved_for_release, archived, rejected,
               version
        FROM suggestions
        WHERE id = $1
        FOR UPDATE
        "
    } else {
        r"
        SELECT id, suggestion, description, date_created, author, user_votes,
               suggestion_status, owner_notes, approved_for_release, archived, rejected,
               version
        FROM suggestions
        WHERE id = $1
        "
    };

    let result = sqlx::query_as::<_, SuggestionModel>(sql)
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)?;

    Ok(result.map(Suggestion::from))
}

pub(super) async fn insert_suggestion(
    conn: &mut PgConnection,
    suggestion: &Suggestion,
) -> RepoResult<()> {
    let row = SuggestionWrite::new(suggestion);

    sqlx::query(
        r"
        INSERT INTO suggestions (id, suggestion, description, date_created, author, user_votes,
                                 suggestion_status, owner_notes, approved_for_release, archived,
                                 rejected, version)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ",
    )
    .bind(row.id)
    .bind(row.suggestion)
    .bind(row.description)
    .bind(row.date_created)
    .bind(row.author)
    .bind(row.user_votes)
    .bind(row.suggestion_status)
    .bind(row.owner_notes)
    .bind(row.approved_for_release)
    .bind(row.archived)
    .bind(row.rejected)
    .bind(row.version)
    .execute(conn)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::AlreadyExists(suggestion.id.clone())))?;

    Ok(())
}

/// Replace the stored document if its version still matches
pub(super) async fn replace_suggestion(
    conn: &mut PgConnection,
    suggestion: &Suggestion,
) -> RepoResult<()> {
    let row = SuggestionWrite::new(suggestion);

    let result = sqlx::query(
        r"
        UPDATE suggestions
        SET suggestion = $3, description = $4, author = $5, user_votes = $6,
            suggestion_status = $7, owner_notes = $8, approved_for_release = $9,
            archived = $10, rejected = $11, version = version + 1
        WHERE id = $1 AND version = $2
        ",
    )
    .bind(row.id)
    .bind(row.version)
    .bind(row.suggestion)
    .bind(row.description)
    .bind(row.author)
    .bind(row.user_votes)
    .bind(row.suggestion_status)
    .bind(row.owner_notes)
    .bind(row.approved_for_release)
    .bind(row.archived)
    .bind(row.rejected)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM suggestions WHERE id = $1)
            ",
        )
        .bind(&suggestion.id)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        return Err(if exists {
            version_conflict(COLLECTION, &suggestion.id, suggestion.version)
        } else {
            suggestion_not_found(&suggestion.id)
        });
    }

    Ok(())
}
