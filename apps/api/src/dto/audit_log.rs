use atrium_application::pagination::CursorPage;
use atrium_application::{AuditLogEntry, AuditLogQuery};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::PageCursorResponse;

/// Optional audit log filters, read from the same query string as the
/// paging parameters.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-filter-query.ts"
)]
pub struct AuditLogFilterQuery {
    pub action: Option<String>,
    pub subject: Option<String>,
}

impl From<AuditLogFilterQuery> for AuditLogQuery {
    fn from(value: AuditLogFilterQuery) -> Self {
        Self {
            action: value.action,
            subject: value.subject,
        }
    }
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id.to_string(),
            subject: value.subject,
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// One page of audit log entries.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/audit-log-page-response.ts"
)]
pub struct AuditLogPageResponse {
    pub data: Vec<AuditLogEntryResponse>,
    pub cursor: PageCursorResponse,
}

impl From<CursorPage<AuditLogEntry>> for AuditLogPageResponse {
    fn from(value: CursorPage<AuditLogEntry>) -> Self {
        Self {
            data: value
                .data
                .into_iter()
                .map(AuditLogEntryResponse::from)
                .collect(),
            cursor: value.cursor.into(),
        }
    }
}
