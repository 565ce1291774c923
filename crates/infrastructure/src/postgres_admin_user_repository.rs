use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{AdminUserRecord, AdminUserRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{AdminUserId, RoleId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::postgres_keyset::{push_keyset_order_and_limit, push_keyset_predicate};

#[cfg(test)]
mod tests;

const ADMIN_USER_COLUMNS: &str = "a.id, a.tenant_id, a.username, a.email, a.first_name, \
     a.last_name, a.full_name, a.bio, a.image, a.phone, a.role_id, a.password_hash, \
     a.verified_at, a.created_by, a.updated_by, a.created_at, a.updated_at";

/// PostgreSQL-backed admin account repository.
#[derive(Clone)]
pub struct PostgresAdminUserRepository {
    pool: PgPool,
}

impl PostgresAdminUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_optional(
        &self,
        mut builder: QueryBuilder<'_, Postgres>,
        operation: &str,
    ) -> AppResult<Option<AdminUserRecord>> {
        let row = builder
            .build_query_as::<AdminUserRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to {operation}: {error}")))?;

        Ok(row.map(AdminUserRecord::from))
    }
}

#[derive(Debug, FromRow)]
struct AdminUserRow {
    id: Uuid,
    tenant_id: Uuid,
    username: Option<String>,
    email: String,
    first_name: String,
    last_name: String,
    full_name: String,
    bio: Option<String>,
    image: Option<String>,
    phone: Option<String>,
    role_id: Uuid,
    password_hash: String,
    verified_at: Option<DateTime<Utc>>,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdminUserRow> for AdminUserRecord {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: AdminUserId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            full_name: row.full_name,
            bio: row.bio,
            image: row.image,
            phone: row.phone,
            role_id: RoleId::from_uuid(row.role_id),
            password_hash: row.password_hash,
            verified_at: row.verified_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AdminUserRepository for PostgresAdminUserRepository {
    async fn create_admin_user(&self, record: AdminUserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_users (
                id, tenant_id, username, email, first_name, last_name, full_name,
                bio, image, phone, role_id, password_hash, verified_at,
                created_by, updated_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.tenant_id.as_uuid())
        .bind(record.username.as_deref())
        .bind(record.email.as_str())
        .bind(record.first_name.as_str())
        .bind(record.last_name.as_str())
        .bind(record.full_name.as_str())
        .bind(record.bio.as_deref())
        .bind(record.image.as_deref())
        .bind(record.phone.as_deref())
        .bind(record.role_id.as_uuid())
        .bind(record.password_hash.as_str())
        .bind(record.verified_at)
        .bind(record.created_by.as_str())
        .bind(record.updated_by.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| admin_conflict_or_internal(error, "create admin user"))?;

        Ok(())
    }

    async fn find_admin_user(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<Option<AdminUserRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_users AS a \
             WHERE a.deleted_at IS NULL AND a.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        builder.push(" AND a.id = ");
        builder.push_bind(admin_id.as_uuid());

        self.fetch_optional(builder, "find admin user").await
    }

    async fn find_admin_user_by_email(&self, email: &str) -> AppResult<Option<AdminUserRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_users AS a \
             WHERE a.deleted_at IS NULL AND a.email = "
        ));
        builder.push_bind(email.to_owned());

        self.fetch_optional(builder, "find admin user by email")
            .await
    }

    async fn find_admin_user_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<AdminUserRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_users AS a \
             WHERE a.deleted_at IS NULL AND a.username = "
        ));
        builder.push_bind(username.to_owned());

        self.fetch_optional(builder, "find admin user by username")
            .await
    }

    async fn list_admin_users(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<AdminUserRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_users AS a \
             WHERE a.deleted_at IS NULL AND a.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        push_keyset_predicate(&mut builder, window, "a");
        push_keyset_order_and_limit(&mut builder, window, "a");

        let rows = builder
            .build_query_as::<AdminUserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list admin users: {error}")))?;

        Ok(rows.into_iter().map(AdminUserRecord::from).collect())
    }

    async fn update_admin_user(&self, record: AdminUserRecord) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE admin_users
            SET username = $3,
                email = $4,
                first_name = $5,
                last_name = $6,
                full_name = $7,
                bio = $8,
                image = $9,
                phone = $10,
                role_id = $11,
                password_hash = $12,
                verified_at = $13,
                updated_by = $14,
                updated_at = $15
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(record.tenant_id.as_uuid())
        .bind(record.id.as_uuid())
        .bind(record.username.as_deref())
        .bind(record.email.as_str())
        .bind(record.first_name.as_str())
        .bind(record.last_name.as_str())
        .bind(record.full_name.as_str())
        .bind(record.bio.as_deref())
        .bind(record.image.as_deref())
        .bind(record.phone.as_deref())
        .bind(record.role_id.as_uuid())
        .bind(record.password_hash.as_str())
        .bind(record.verified_at)
        .bind(record.updated_by.as_str())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| admin_conflict_or_internal(error, "update admin user"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "admin user '{}' does not exist",
                record.id
            )));
        }

        Ok(())
    }

    async fn soft_delete_admin_user(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE admin_users
            SET deleted_at = now(), deleted_by = $3
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(admin_id.as_uuid())
        .bind(deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete admin user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "admin user '{admin_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn count_admin_users(&self, tenant_id: TenantId) -> AppResult<usize> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM admin_users
            WHERE tenant_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count admin users: {error}")))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn count_admin_users_with_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<usize> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM admin_users
            WHERE tenant_id = $1 AND role_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count admin users with role: {error}"))
        })?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn admin_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("an admin with this email or username already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
