use async_trait::async_trait;
use atrium_core::{AppResult, TenantId};
use atrium_domain::AuditAction;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::pagination::{CursorKeyed, CursorKind, CursorValue, KeysetWindow, PaginationKey};

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Tenant scope for the event.
    pub tenant_id: TenantId,
    /// Subject that performed the action.
    pub subject: String,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Audit log entry projection for administrative views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Stable event identifier.
    pub event_id: Uuid,
    /// Actor subject.
    pub subject: String,
    /// Stable action identifier.
    pub action: String,
    /// Event resource type.
    pub resource_type: String,
    /// Event resource identifier.
    pub resource_id: String,
    /// Optional event detail.
    pub detail: Option<String>,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}

/// Ordering keys of the audit log.
pub const AUDIT_LOG_PAGINATION_KEYS: [PaginationKey; 2] = [
    PaginationKey::required("created_at", CursorKind::Timestamp),
    PaginationKey::required("id", CursorKind::Uuid),
];

impl CursorKeyed for AuditLogEntry {
    fn cursor_value(&self, column: &str) -> Option<CursorValue> {
        match column {
            "created_at" => Some(CursorValue::Timestamp(self.created_at)),
            "id" => Some(CursorValue::Uuid(self.event_id)),
            _ => None,
        }
    }
}

/// Filters for audit log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Optional action filter.
    pub action: Option<String>,
    /// Optional subject filter.
    pub subject: Option<String>,
}

/// Port for reading the audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists entries of a tenant matching `query` inside the keyset window.
    async fn list_audit_entries(
        &self,
        tenant_id: TenantId,
        query: &AuditLogQuery,
        window: &KeysetWindow,
    ) -> AppResult<Vec<AuditLogEntry>>;

    /// Finds one entry of a tenant.
    async fn find_audit_entry(
        &self,
        tenant_id: TenantId,
        event_id: Uuid,
    ) -> AppResult<Option<AuditLogEntry>>;
}
