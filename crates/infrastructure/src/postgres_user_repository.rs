use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{UserListFilter, UserRecord, UserRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::UserId;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::postgres_keyset::{push_keyset_order_and_limit, push_keyset_predicate};


const USER_COLUMNS: &str = "u.id, u.tenant_id, u.username, u.email, u.bio, u.image, \
     u.password_hash, u.created_by, u.updated_by, u.created_at, u.updated_at";

/// PostgreSQL-backed end-user repository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    tenant_id: Uuid,
    username: String,
    email: String,
    bio: Option<String>,
    image: Option<String>,
    password_hash: String,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            username: row.username,
            email: row.email,
            bio: row.bio,
            image: row.image,
            password_hash: row.password_hash,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, record: UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, tenant_id, username, email, bio, image, password_hash,
                created_by, updated_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.tenant_id.as_uuid())
        .bind(record.username.as_str())
        .bind(record.email.as_str())
        .bind(record.bio.as_deref())
        .bind(record.image.as_deref())
        .bind(record.password_hash.as_str())
        .bind(record.created_by.as_str())
        .bind(record.updated_by.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_user_conflict(error, &record, "create user"))?;

        Ok(())
    }

    async fn find_user(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users AS u \
             WHERE u.tenant_id = $1 AND u.id = $2 AND u.deleted_at IS NULL"
        ))
        .bind(tenant_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn list_users(
        &self,
        tenant_id: TenantId,
        filter: &UserListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<UserRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {USER_COLUMNS} FROM users AS u WHERE u.deleted_at IS NULL AND u.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        if let Some(fragment) = filter.email.as_deref() {
            builder.push(" AND strpos(u.email, ");
            builder.push_bind(fragment.to_owned());
            builder.push(") > 0");
        }
        push_keyset_predicate(&mut builder, window, "u");
        push_keyset_order_and_limit(&mut builder, window, "u");

        let rows = builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn update_user(&self, record: UserRecord) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $3,
                email = $4,
                bio = $5,
                image = $6,
                updated_by = $7,
                updated_at = $8
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(record.tenant_id.as_uuid())
        .bind(record.id.as_uuid())
        .bind(record.username.as_str())
        .bind(record.email.as_str())
        .bind(record.bio.as_deref())
        .bind(record.image.as_deref())
        .bind(record.updated_by.as_str())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_user_conflict(error, &record, "update user"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                record.id
            )));
        }

        Ok(())
    }

    async fn soft_delete_user(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = now(), deleted_by = $3
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }
}

fn map_user_conflict(error: sqlx::Error, record: &UserRecord, operation: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "username '{}' or email '{}' is already taken",
            record.username, record.email
        ));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
