use async_trait::async_trait;
use atrium_core::{AppResult, TenantId};
use atrium_domain::UserId;
use chrono::{DateTime, Utc};

use crate::pagination::{CursorKeyed, CursorKind, CursorValue, KeysetWindow, PaginationKey};

/// End-user account as stored by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Username, unique among live users of the tenant.
    pub username: String,
    /// Lower-cased email, unique among live users of the tenant.
    pub email: String,
    /// Optional biography.
    pub bio: Option<String>,
    /// Optional avatar URL.
    pub image: Option<String>,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Subject that created the user.
    pub created_by: String,
    /// Subject that last changed the user.
    pub updated_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Ordering keys of user listings.
pub const USER_PAGINATION_KEYS: [PaginationKey; 2] = [
    PaginationKey::required("created_at", CursorKind::Timestamp),
    PaginationKey::required("id", CursorKind::Uuid),
];

impl CursorKeyed for UserRecord {
    fn cursor_value(&self, column: &str) -> Option<CursorValue> {
        match column {
            "created_at" => Some(CursorValue::Timestamp(self.created_at)),
            "id" => Some(CursorValue::Uuid(self.id.as_uuid())),
            _ => None,
        }
    }
}

/// Filters for user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListFilter {
    /// Lower-cased fragment the email must contain.
    pub email: Option<String>,
}

impl UserListFilter {
    /// Evaluates the filter against a record held in memory.
    #[must_use]
    pub fn matches(&self, record: &UserRecord) -> bool {
        self.email
            .as_deref()
            .is_none_or(|fragment| record.email.contains(fragment))
    }
}

/// Repository port for end users. Soft-deleted rows are invisible.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. Fails with `Conflict` on a taken username or email.
    async fn create_user(&self, record: UserRecord) -> AppResult<()>;

    /// Finds a live user in a tenant.
    async fn find_user(&self, tenant_id: TenantId, user_id: UserId)
    -> AppResult<Option<UserRecord>>;

    /// Lists live users of a tenant inside the keyset window.
    async fn list_users(
        &self,
        tenant_id: TenantId,
        filter: &UserListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<UserRecord>>;

    /// Persists the mutable columns of an existing user.
    async fn update_user(&self, record: UserRecord) -> AppResult<()>;

    /// Soft-deletes a user.
    async fn soft_delete_user(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        deleted_by: &str,
    ) -> AppResult<()>;
}
