use async_trait::async_trait;
use atrium_application::{SessionRecord, SessionRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{AdminUserId, SessionId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed refresh session repository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    id: Uuid,
    tenant_id: Uuid,
    admin_id: Uuid,
    secret_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            admin_id: AdminUserId::from_uuid(row.admin_id),
            secret_hash: row.secret_hash,
            expires_at: row.expires_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create_session(&self, record: SessionRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_sessions (
                id, tenant_id, admin_id, secret_hash, expires_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.tenant_id.as_uuid())
        .bind(record.admin_id.as_uuid())
        .bind(record.secret_hash.as_str())
        .bind(record.expires_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create session: {error}")))?;

        Ok(())
    }

    async fn find_session(&self, session_id: SessionId) -> AppResult<Option<SessionRecord>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, tenant_id, admin_id, secret_hash, expires_at, created_at, updated_at
            FROM admin_sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find session: {error}")))?;

        Ok(row.map(SessionRecord::from))
    }

    async fn rotate_session(
        &self,
        session_id: SessionId,
        expected_hash: &str,
        secret_hash: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE admin_sessions
            SET secret_hash = $3, expires_at = $4, updated_at = now()
            WHERE id = $1 AND secret_hash = $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(expected_hash)
        .bind(secret_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session: {error}")))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_session(&self, session_id: SessionId) -> AppResult<()> {
        sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

        Ok(())
    }
}
