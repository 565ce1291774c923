use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{AuditLogEntry, AuditLogQuery, AuditLogRepository};
use atrium_core::{AppError, AppResult, TenantId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::postgres_keyset::{push_keyset_order_and_limit, push_keyset_predicate};


const AUDIT_ENTRY_SELECT: &str = r#"
    SELECT
        e.id AS event_id,
        e.subject,
        e.action,
        e.resource_type,
        e.resource_id,
        e.detail,
        e.created_at
    FROM audit_log_entries AS e
    WHERE e.tenant_id = "#;

/// PostgreSQL-backed repository for audit log read models.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    event_id: Uuid,
    subject: String,
    action: String,
    resource_type: String,
    resource_id: String,
    detail: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AuditLogRow> for AuditLogEntry {
    fn from(row: AuditLogRow) -> Self {
        Self {
            event_id: row.event_id,
            subject: row.subject,
            action: row.action,
            resource_type: row.resource_type,
            resource_id: row.resource_id,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn list_audit_entries(
        &self,
        tenant_id: TenantId,
        query: &AuditLogQuery,
        window: &KeysetWindow,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let mut builder = QueryBuilder::new(AUDIT_ENTRY_SELECT);
        builder.push_bind(tenant_id.as_uuid());
        if let Some(action) = &query.action {
            builder.push(" AND e.action = ");
            builder.push_bind(action.clone());
        }
        if let Some(subject) = &query.subject {
            builder.push(" AND e.subject = ");
            builder.push_bind(subject.clone());
        }
        push_keyset_predicate(&mut builder, window, "e");
        push_keyset_order_and_limit(&mut builder, window, "e");

        let rows = builder
            .build_query_as::<AuditLogRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list audit log entries: {error}"))
            })?;

        Ok(rows.into_iter().map(AuditLogEntry::from).collect())
    }

    async fn find_audit_entry(
        &self,
        tenant_id: TenantId,
        event_id: Uuid,
    ) -> AppResult<Option<AuditLogEntry>> {
        let mut builder = QueryBuilder::new(AUDIT_ENTRY_SELECT);
        builder.push_bind(tenant_id.as_uuid());
        builder.push(" AND e.id = ");
        builder.push_bind(event_id);

        let row = builder
            .build_query_as::<AuditLogRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to find audit log entry: {error}"))
            })?;

        Ok(row.map(AuditLogEntry::from))
    }
}
