use std::collections::HashMap;

use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{
    AdminUserRecord, AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository,
    AuditRepository, AuthorizationRepository, PageRecord, PostRecord, PrincipalGrants, RoleRecord,
    SessionRecord, UserRecord,
};
use atrium_core::{AppResult, TenantId};
use atrium_domain::{AdminUserId, PageId, PostId, RoleId, SessionId, UserId};
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

mod admin_users;
mod pages;
mod posts;
mod roles;
mod sessions;
mod users;


/// In-memory implementation of every persistence port.
///
/// Soft-deleted rows are dropped from the maps, which makes them invisible
/// the same way the PostgreSQL adapters hide rows with `deleted_at` set.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    admins: RwLock<HashMap<AdminUserId, AdminUserRecord>>,
    roles: RwLock<HashMap<RoleId, RoleRecord>>,
    pages: RwLock<HashMap<PageId, PageRecord>>,
    audit_entries: RwLock<Vec<(TenantId, AuditLogEntry)>>,
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
    users: RwLock<HashMap<UserId, UserRecord>>,
    posts: RwLock<HashMap<PostId, PostRecord>>,
}

impl InMemoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditRepository for InMemoryRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let mut entries = self.audit_entries.write().await;

        // Entries stay strictly ordered by append time.
        let mut created_at = Utc::now();
        if let Some((_, last)) = entries.last()
            && last.created_at >= created_at
        {
            created_at = last.created_at + Duration::microseconds(1);
        }

        entries.push((
            event.tenant_id,
            AuditLogEntry {
                event_id: Uuid::new_v4(),
                subject: event.subject,
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type,
                resource_id: event.resource_id,
                detail: event.detail,
                created_at,
            },
        ));

        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryRepository {
    async fn list_audit_entries(
        &self,
        tenant_id: TenantId,
        query: &AuditLogQuery,
        window: &KeysetWindow,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.audit_entries.read().await;

        window.apply(
            entries
                .iter()
                .filter(|(entry_tenant_id, _)| *entry_tenant_id == tenant_id)
                .map(|(_, entry)| entry)
                .filter(|entry| {
                    query
                        .action
                        .as_deref()
                        .is_none_or(|action| entry.action == action)
                })
                .filter(|entry| {
                    query
                        .subject
                        .as_deref()
                        .is_none_or(|subject| entry.subject == subject)
                })
                .cloned(),
        )
    }

    async fn find_audit_entry(
        &self,
        tenant_id: TenantId,
        event_id: Uuid,
    ) -> AppResult<Option<AuditLogEntry>> {
        Ok(self
            .audit_entries
            .read()
            .await
            .iter()
            .find(|(entry_tenant_id, entry)| {
                *entry_tenant_id == tenant_id && entry.event_id == event_id
            })
            .map(|(_, entry)| entry.clone()))
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryRepository {
    async fn find_grants_for_admin(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<PrincipalGrants> {
        let role_id = match self.admins.read().await.get(&admin_id) {
            Some(admin) if admin.tenant_id == tenant_id => admin.role_id,
            _ => return Ok(PrincipalGrants::UnknownPrincipal),
        };

        Ok(match self.roles.read().await.get(&role_id) {
            Some(role) if role.tenant_id == tenant_id => PrincipalGrants::Resolved {
                role_id,
                grants: role.grants.clone(),
            },
            _ => PrincipalGrants::MissingRole { role_id },
        })
    }
}
