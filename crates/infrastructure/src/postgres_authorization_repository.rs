use std::str::FromStr;

use async_trait::async_trait;
use atrium_application::{AuthorizationRepository, PrincipalGrants};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{AdminUserId, Grant, RoleId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;


/// PostgreSQL-backed repository resolving an admin's role grants.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PrincipalRoleRow {
    role_id: Uuid,
    role_found: bool,
    permissions: Option<Vec<String>>,
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn find_grants_for_admin(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<PrincipalGrants> {
        let row = sqlx::query_as::<_, PrincipalRoleRow>(
            r#"
            SELECT
                admins.role_id,
                roles.id IS NOT NULL AS role_found,
                roles.permissions
            FROM admin_users AS admins
            LEFT JOIN roles
                ON roles.id = admins.role_id
                AND roles.tenant_id = admins.tenant_id
                AND roles.deleted_at IS NULL
            WHERE admins.tenant_id = $1
                AND admins.id = $2
                AND admins.deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(admin_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

        let Some(row) = row else {
            return Ok(PrincipalGrants::UnknownPrincipal);
        };

        let role_id = RoleId::from_uuid(row.role_id);
        if !row.role_found {
            return Ok(PrincipalGrants::MissingRole { role_id });
        }

        let grants = row
            .permissions
            .unwrap_or_default()
            .iter()
            .map(|permission| {
                Grant::from_str(permission).map_err(|error| {
                    AppError::Configuration(format!(
                        "failed to decode grant '{permission}' of role '{role_id}': {error}"
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PrincipalGrants::Resolved { role_id, grants })
    }
}
