//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use suggestion_core::entities::User;
use suggestion_core::error::DomainError;
use suggestion_core::traits::{RepoResult, UserRepository};

use crate::mappers::UserWrite;
use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found, version_conflict};

const COLLECTION: &str = "users";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        find_user(&mut conn, id, false).await
    }

    #[instrument(skip(self))]
    async fn find_by_object_identifier(
        &self,
        object_identifier: &str,
    ) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, object_identifier, first_name, last_name, display_name, email_address,
                   authored_suggestions, voted_on_suggestions, version
            FROM users
            WHERE object_identifier = $1
            ",
        )
        .bind(object_identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let results = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, object_identifier, first_name, last_name, display_name, email_address,
                   authored_suggestions, voted_on_suggestions, version
            FROM users
            ORDER BY display_name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> RepoResult<()> {
        let row = UserWrite::new(user);

        sqlx::query(
            r"
            INSERT INTO users (id, object_identifier, first_name, last_name, display_name,
                               email_address, authored_suggestions, voted_on_suggestions, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(row.id)
        .bind(row.object_identifier)
        .bind(row.first_name)
        .bind(row.last_name)
        .bind(row.display_name)
        .bind(row.email_address)
        .bind(row.authored_suggestions)
        .bind(row.voted_on_suggestions)
        .bind(row.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyExists(user.id.clone())))?;

        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        replace_user(&mut conn, user).await
    }
}

/// Load a user, optionally locking the row until the transaction ends
pub(super) async fn find_user(
    conn: &mut PgConnection,
    id: &str,
    for_update: bool,
) -> RepoResult<Option<User>> {
    let sql = if for_update {
        r"
        SELECT id, object_identifier, first_name, last_name, display_name, email_address,
               authored_suggestions, voted_on_suggestions, version
        FROM users
        WHERE id = $1
        FOR UPDATE
        "
    } else {
        r"
        SELECT id, object_identifier, first_name, last_name, display_name, email_address,
               authored_suggestions, voted_on_suggestions, version
        FROM users
        WHERE id = $1
        "
    };

    let result = sqlx::query_as::<_, UserModel>(sql)
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)?;

    Ok(result.map(User::from))
}

/// Replace the stored document if its version still matches
pub(super) async fn replace_user(conn: &mut PgConnection, user: &User) -> RepoResult<()> {
    let row = UserWrite::new(user);

    let result = sqlx::query(
        r"
        UPDATE users
        SET object_identifier = $3, first_name = $4, last_name = $5, display_name = $6,
            email_address = $7, authored_suggestions = $8, voted_on_suggestions = $9,
            version = version + 1
        WHERE id = $1 AND version = $2
        ",
    )
    .bind(row.id)
    .bind(row.version)
    .bind(row.object_identifier)
    .bind(row.first_name)
    .bind(row.last_name)
    .bind(row.display_name)
    .bind(row.email_address)
    .bind(row.authored_suggestions)
    .bind(row.voted_on_suggestions)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            ",
        )
        .bind(&user.id)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        return Err(if exists {
            version_conflict(COLLECTION, &user.id, user.version)
        } else {
            user_not_found(&user.id)
        });
    }

    Ok(())
}
