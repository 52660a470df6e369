//! PostgreSQL implementation of StatusRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use suggestion_core::entities::Status;
use suggestion_core::error::DomainError;
use suggestion_core::traits::{RepoResult, StatusRepository};

use crate::models::StatusModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of StatusRepository
#[derive(Clone)]
pub struct PgStatusRepository {
    pool: PgPool,
}

impl PgStatusRepository {
    /// Create a new PgStatusRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusRepository for PgStatusRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Status>> {
        let results = sqlx::query_as::<_, StatusModel>(
            r"
            SELECT id, status_name, status_description
            FROM statuses
            ORDER BY status_name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Status::from).collect())
    }

    #[instrument(skip(self, status), fields(status_id = %status.id))]
    async fn create(&self, status: &Status) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO statuses (id, status_name, status_description)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(&status.id)
        .bind(&status.status_name)
        .bind(&status.status_description)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyExists(status.id.clone())))?;

        Ok(())
    }
}
