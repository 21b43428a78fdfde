use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    CredentialRecord, DuplicateField, NewUser, Repository, RepositoryError, RepositoryPtr, Role,
};

#[derive(sqlx::FromRow)]
struct CredentialRow {
    // ---
    user_id: i64,
    username: String,
    password_hash: String,
    role: String,
    first_name: String,
    last_name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<CredentialRow> for CredentialRecord {
    fn from(r: CredentialRow) -> Self {
        // ---
        CredentialRecord {
            user_id: r.user_id,
            username: r.username,
            password_hash: r.password_hash,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            // Unknown role strings degrade to the least-privileged role.
            role: r.role.parse().unwrap_or(Role::User),
            created_at: r.created_at,
        }
    }
}

pub fn create_postgres_repository(pool: PgPool) -> RepositoryPtr {
    // ---
    std::sync::Arc::new(PostgresRepository::new(pool))
}

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

/// Maps driver errors into the repository taxonomy.
///
/// Pool-acquire timeouts are reported distinctly from query failures, and
/// unique-constraint violations (SQLSTATE 23505) carry which field collided
/// based on the constraint name.
fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    // ---
    match &err {
        sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            let constraint = db.constraint().unwrap_or_default();
            if constraint.contains("email") {
                RepositoryError::Duplicate(DuplicateField::Email)
            } else {
                RepositoryError::Duplicate(DuplicateField::Username)
            }
        }
        _ => RepositoryError::Database(err),
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn find_credential_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, RepositoryError> {
        // ---
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT c.user_id, c.username, c.password_hash, c.role,
                    u.first_name, u.last_name, u.email, c.created_at
             FROM credentials c
             JOIN users u ON u.id = c.user_id
             WHERE c.username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(CredentialRecord::from))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        // ---
        let found: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM credentials WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(found.is_some())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepositoryError> {
        // ---
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(found.is_some())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<i64, RepositoryError> {
        // ---
        // One transaction across both inserts: the profile and credential
        // rows exist together or not at all. Dropping the transaction on an
        // early return rolls back the first insert.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let (user_id,): (i64,) = sqlx::query_as(
            "INSERT INTO users (first_name, last_name, email)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        sqlx::query(
            "INSERT INTO credentials (user_id, username, password_hash)
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        Ok(user_id)
    }
}
