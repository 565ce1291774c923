use async_trait::async_trait;
use atrium_core::{AppResult, TenantId};
use atrium_domain::{AdminUserId, RoleId};
use chrono::{DateTime, Utc};

use crate::pagination::{CursorKeyed, CursorKind, CursorValue, KeysetWindow, PaginationKey};

/// Admin account as stored by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUserRecord {
    /// Unique admin identifier.
    pub id: AdminUserId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Optional unique username.
    pub username: Option<String>,
    /// Canonical lower-cased email, unique among live admins.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Derived `"{first} {last}"`.
    pub full_name: String,
    /// Optional short biography.
    pub bio: Option<String>,
    /// Optional avatar URL.
    pub image: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Assigned role.
    pub role_id: RoleId,
    /// Argon2id password hash.
    pub password_hash: String,
    /// When the account was verified, if ever.
    pub verified_at: Option<DateTime<Utc>>,
    /// Subject that created the record.
    pub created_by: String,
    /// Subject that last changed the record.
    pub updated_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Ordering keys of admin user listings.
pub const ADMIN_USER_PAGINATION_KEYS: [PaginationKey; 2] = [
    PaginationKey::required("created_at", CursorKind::Timestamp),
    PaginationKey::required("id", CursorKind::Uuid),
];

impl CursorKeyed for AdminUserRecord {
    fn cursor_value(&self, column: &str) -> Option<CursorValue> {
        match column {
            "created_at" => Some(CursorValue::Timestamp(self.created_at)),
            "id" => Some(CursorValue::Uuid(self.id.as_uuid())),
            _ => None,
        }
    }
}

/// Repository port for admin accounts. Soft-deleted rows are invisible.
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    /// Inserts a new admin. Fails with `Conflict` on a taken email or username.
    async fn create_admin_user(&self, record: AdminUserRecord) -> AppResult<()>;

    /// Finds a live admin in a tenant.
    async fn find_admin_user(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<Option<AdminUserRecord>>;

    /// Finds a live admin by canonical email across tenants.
    async fn find_admin_user_by_email(&self, email: &str) -> AppResult<Option<AdminUserRecord>>;

    /// Finds a live admin by username across tenants.
    async fn find_admin_user_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<AdminUserRecord>>;

    /// Lists live admins of a tenant inside the keyset window.
    async fn list_admin_users(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<AdminUserRecord>>;

    /// Persists the mutable columns of an existing admin.
    async fn update_admin_user(&self, record: AdminUserRecord) -> AppResult<()>;

    /// Soft-deletes an admin.
    async fn soft_delete_admin_user(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
        deleted_by: &str,
    ) -> AppResult<()>;

    /// Counts live admins of a tenant.
    async fn count_admin_users(&self, tenant_id: TenantId) -> AppResult<usize>;

    /// Counts live admins of a tenant holding a role.
    async fn count_admin_users_with_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<usize>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
