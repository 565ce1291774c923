use std::sync::Arc;

use atrium_core::{AppError, AppResult};
use atrium_domain::AdminIdentity;
use uuid::Uuid;

use crate::pagination::{CursorPage, CursorPageRequest, PaginationSettings};
use crate::{AUDIT_LOG_PAGINATION_KEYS, AuditLogEntry, AuditLogQuery, AuditLogRepository};

/// Application service for audit log reads.
#[derive(Clone)]
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
    pagination: PaginationSettings,
}

impl AuditLogService {
    /// Creates a new audit log service.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>, pagination: PaginationSettings) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// Lists one page of the actor's tenant audit log.
    pub async fn list_entries(
        &self,
        actor: &AdminIdentity,
        query: AuditLogQuery,
        request: CursorPageRequest,
    ) -> AppResult<CursorPage<AuditLogEntry>> {
        let query = AuditLogQuery {
            action: query.action.filter(|value| !value.trim().is_empty()),
            subject: query.subject.filter(|value| !value.trim().is_empty()),
        };

        let paginator = self
            .pagination
            .paginator(AUDIT_LOG_PAGINATION_KEYS.to_vec(), request)?;
        let tenant_id = actor.tenant_id();

        paginator
            .paginate(|window| async move {
                self.repository
                    .list_audit_entries(tenant_id, &query, &window)
                    .await
            })
            .await
    }

    /// Returns one entry of the actor's tenant audit log.
    pub async fn get_entry(
        &self,
        actor: &AdminIdentity,
        event_id: Uuid,
    ) -> AppResult<AuditLogEntry> {
        self.repository
            .find_audit_entry(actor.tenant_id(), event_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("audit log entry '{event_id}' does not exist"))
            })
    }
}
