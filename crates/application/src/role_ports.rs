use async_trait::async_trait;
use atrium_core::{AppResult, TenantId};
use atrium_domain::{Grant, RoleId};
use chrono::{DateTime, Utc};

use crate::pagination::{CursorKeyed, CursorKind, CursorValue, KeysetWindow, PaginationKey};

/// Role definition as stored by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Unique role identifier.
    pub id: RoleId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Name, unique among live roles of the tenant.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Ordered, de-duplicated grants.
    pub grants: Vec<Grant>,
    /// Subject that created the role.
    pub created_by: String,
    /// Subject that last changed the role.
    pub updated_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Ordering keys of role listings.
pub const ROLE_PAGINATION_KEYS: [PaginationKey; 2] = [
    PaginationKey::required("created_at", CursorKind::Timestamp),
    PaginationKey::required("id", CursorKind::Uuid),
];

impl CursorKeyed for RoleRecord {
    fn cursor_value(&self, column: &str) -> Option<CursorValue> {
        match column {
            "created_at" => Some(CursorValue::Timestamp(self.created_at)),
            "id" => Some(CursorValue::Uuid(self.id.as_uuid())),
            _ => None,
        }
    }
}

/// Repository port for roles. Soft-deleted rows are invisible.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Inserts a new role. Fails with `Conflict` on a taken name.
    async fn create_role(&self, record: RoleRecord) -> AppResult<()>;

    /// Finds a live role in a tenant.
    async fn find_role(&self, tenant_id: TenantId, role_id: RoleId)
    -> AppResult<Option<RoleRecord>>;

    /// Finds a live role of a tenant by its name.
    async fn find_role_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<RoleRecord>>;

    /// Lists live roles of a tenant inside the keyset window.
    async fn list_roles(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<RoleRecord>>;

    /// Persists the mutable columns of an existing role.
    async fn update_role(&self, record: RoleRecord) -> AppResult<()>;

    /// Soft-deletes a role.
    async fn soft_delete_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        deleted_by: &str,
    ) -> AppResult<()>;
}
