use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{RoleRecord, RoleRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{Grant, RoleId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::postgres_keyset::{push_keyset_order_and_limit, push_keyset_predicate};

#[cfg(test)]
mod tests;

const ROLE_COLUMNS: &str = "r.id, r.tenant_id, r.name, r.description, r.permissions, \
     r.created_by, r.updated_by, r.created_at, r.updated_at";

/// PostgreSQL-backed role repository.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    description: Option<String>,
    permissions: Vec<String>,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoleRow> for RoleRecord {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let grants = parse_stored_grants(&row.permissions).map_err(|error| {
            AppError::Internal(format!("role '{}' has unreadable grants: {error}", row.id))
        })?;

        Ok(Self {
            id: RoleId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            name: row.name,
            description: row.description,
            grants,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn parse_stored_grants(permissions: &[String]) -> AppResult<Vec<Grant>> {
    permissions
        .iter()
        .map(|permission| permission.parse::<Grant>())
        .collect()
}

fn grant_strings(grants: &[Grant]) -> Vec<String> {
    grants.iter().map(ToString::to_string).collect()
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create_role(&self, record: RoleRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO roles (
                id, tenant_id, name, description, permissions,
                created_by, updated_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.tenant_id.as_uuid())
        .bind(record.name.as_str())
        .bind(record.description.as_deref())
        .bind(grant_strings(&record.grants))
        .bind(record.created_by.as_str())
        .bind(record.updated_by.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, &record.name, "create role"))?;

        Ok(())
    }

    async fn find_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles AS r \
             WHERE r.tenant_id = $1 AND r.id = $2 AND r.deleted_at IS NULL"
        ))
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        row.map(RoleRecord::try_from).transpose()
    }

    async fn find_role_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<RoleRecord>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles AS r \
             WHERE r.tenant_id = $1 AND r.name = $2 AND r.deleted_at IS NULL"
        ))
        .bind(tenant_id.as_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role by name: {error}")))?;

        row.map(RoleRecord::try_from).transpose()
    }

    async fn list_roles(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<RoleRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {ROLE_COLUMNS} FROM roles AS r WHERE r.deleted_at IS NULL AND r.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        push_keyset_predicate(&mut builder, window, "r");
        push_keyset_order_and_limit(&mut builder, window, "r");

        let rows = builder
            .build_query_as::<RoleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(RoleRecord::try_from).collect()
    }

    async fn update_role(&self, record: RoleRecord) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET name = $3,
                description = $4,
                permissions = $5,
                updated_by = $6,
                updated_at = $7
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(record.tenant_id.as_uuid())
        .bind(record.id.as_uuid())
        .bind(record.name.as_str())
        .bind(record.description.as_deref())
        .bind(grant_strings(&record.grants))
        .bind(record.updated_by.as_str())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, &record.name, "update role"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                record.id
            )));
        }

        Ok(())
    }

    async fn soft_delete_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET deleted_at = now(), deleted_by = $3
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .bind(deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        Ok(())
    }
}

fn map_role_conflict(error: sqlx::Error, role_name: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
