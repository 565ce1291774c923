//! Admin account management.
//!
//! Route-level grants are enforced by the policy gate; this service adds the
//! record-level rules that need the resolved ability: updating another
//! admin, reassigning roles and deleting one's own account.

use std::sync::Arc;

use atrium_core::{AppError, AppResult};
use atrium_domain::{AdminIdentity, AdminUserId, RoleId};

use crate::pagination::{CursorPage, CursorPageRequest, PaginationSettings};
use crate::{
    ADMIN_USER_PAGINATION_KEYS, AdminUserRecord, AdminUserRepository, AuditRepository,
    PasswordHasher, RoleRepository,
};

mod lifecycle;
mod profile;


/// Maximum length of an admin biography.
pub const BIO_MAX_LENGTH: usize = 500;

/// Maximum length of an avatar URL.
pub const IMAGE_MAX_LENGTH: usize = 2048;

/// Maximum length of a phone number.
pub const PHONE_MAX_LENGTH: usize = 32;

/// Input for creating an admin account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAdminUserInput {
    /// Optional username.
    pub username: Option<String>,
    /// Login email.
    pub email: String,
    /// Initial plaintext password.
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional biography.
    pub bio: Option<String>,
    /// Optional avatar URL.
    pub image: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Role to assign.
    pub role_id: RoleId,
}

/// Partial update of an admin account. `None` keeps the current value and an
/// empty string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAdminUserInput {
    /// New username.
    pub username: Option<String>,
    /// New login email.
    pub email: Option<String>,
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New biography.
    pub bio: Option<String>,
    /// New avatar URL.
    pub image: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New role; requires `update:Admin`.
    pub role_id: Option<RoleId>,
}

/// Input for changing the caller's own password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePasswordInput {
    /// Current plaintext password.
    pub current_password: String,
    /// New plaintext password.
    pub new_password: String,
}

/// Application service for admin accounts.
#[derive(Clone)]
pub struct AdminUserService {
    repository: Arc<dyn AdminUserRepository>,
    role_repository: Arc<dyn RoleRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
    pagination: PaginationSettings,
}

impl AdminUserService {
    /// Creates a new admin user service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AdminUserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit_repository: Arc<dyn AuditRepository>,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            repository,
            role_repository,
            password_hasher,
            audit_repository,
            pagination,
        }
    }

    /// Returns one admin of the actor's tenant.
    pub async fn get_admin_user(
        &self,
        actor: &AdminIdentity,
        admin_id: AdminUserId,
    ) -> AppResult<AdminUserRecord> {
        self.repository
            .find_admin_user(actor.tenant_id(), admin_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("admin user '{admin_id}' does not exist")))
    }

    /// Returns the actor's own admin record.
    pub async fn current_admin_user(&self, actor: &AdminIdentity) -> AppResult<AdminUserRecord> {
        self.get_admin_user(actor, actor.admin_id()).await
    }

    /// Lists one page of the actor's tenant admins.
    pub async fn list_admin_users(
        &self,
        actor: &AdminIdentity,
        request: CursorPageRequest,
    ) -> AppResult<CursorPage<AdminUserRecord>> {
        let paginator = self
            .pagination
            .paginator(ADMIN_USER_PAGINATION_KEYS.to_vec(), request)?;
        let tenant_id = actor.tenant_id();

        paginator
            .paginate(|window| async move {
                self.repository.list_admin_users(tenant_id, &window).await
            })
            .await
    }

    async fn require_role(&self, actor: &AdminIdentity, role_id: RoleId) -> AppResult<()> {
        self.role_repository
            .find_role(actor.tenant_id(), role_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::Validation(format!("role '{role_id}' does not exist")))
    }

    async fn ensure_email_available(
        &self,
        email: &str,
        current: Option<AdminUserId>,
    ) -> AppResult<()> {
        match self.repository.find_admin_user_by_email(email).await? {
            Some(existing) if Some(existing.id) != current => Err(AppError::Conflict(format!(
                "an admin with email '{email}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}
