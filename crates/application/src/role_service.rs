use std::sync::Arc;

use atrium_core::{AppError, AppResult};
use atrium_domain::{AdminIdentity, AuditAction, Grant, RoleId};
use chrono::Utc;

use crate::inputs::{optional_text, required_text};
use crate::pagination::{CursorPage, CursorPageRequest, PaginationSettings};
use crate::{
    AdminUserRepository, AuditEvent, AuditRepository, ROLE_PAGINATION_KEYS, RoleRecord,
    RoleRepository,
};


/// Maximum length of a role name.
pub const ROLE_NAME_MAX_LENGTH: usize = 100;

/// Maximum length of a role description.
pub const ROLE_DESCRIPTION_MAX_LENGTH: usize = 500;

/// Input for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Grants in wire form, e.g. `read:Page`.
    pub permissions: Vec<String>,
}

/// Partial update of a role. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New name.
    pub name: Option<String>,
    /// New description; empty clears it.
    pub description: Option<String>,
    /// Replacement grants in wire form.
    pub permissions: Option<Vec<String>>,
}

/// Application service for role administration.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
    admin_user_repository: Arc<dyn AdminUserRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    pagination: PaginationSettings,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleRepository>,
        admin_user_repository: Arc<dyn AdminUserRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            repository,
            admin_user_repository,
            audit_repository,
            pagination,
        }
    }

    /// Returns the grants a role may hold.
    #[must_use]
    pub fn permission_catalogue(&self) -> Vec<Grant> {
        Grant::catalogue()
    }

    /// Creates a role in the actor's tenant.
    pub async fn create_role(
        &self,
        actor: &AdminIdentity,
        input: CreateRoleInput,
    ) -> AppResult<RoleRecord> {
        let now = Utc::now();
        let record = RoleRecord {
            id: RoleId::new(),
            tenant_id: actor.tenant_id(),
            name: required_text(input.name, "role name", ROLE_NAME_MAX_LENGTH)?,
            description: optional_text(
                input.description,
                "role description",
                ROLE_DESCRIPTION_MAX_LENGTH,
            )?,
            grants: parse_grants(&input.permissions)?,
            created_by: actor.subject().to_owned(),
            updated_by: actor.subject().to_owned(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create_role(record.clone()).await?;
        self.append_role_event(actor, AuditAction::RoleCreated, &record)
            .await?;

        Ok(record)
    }

    /// Returns one role of the actor's tenant.
    pub async fn get_role(&self, actor: &AdminIdentity, role_id: RoleId) -> AppResult<RoleRecord> {
        self.repository
            .find_role(actor.tenant_id(), role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    /// Lists one page of the actor's tenant roles.
    pub async fn list_roles(
        &self,
        actor: &AdminIdentity,
        request: CursorPageRequest,
    ) -> AppResult<CursorPage<RoleRecord>> {
        let paginator = self
            .pagination
            .paginator(ROLE_PAGINATION_KEYS.to_vec(), request)?;
        let tenant_id = actor.tenant_id();

        paginator
            .paginate(|window| async move { self.repository.list_roles(tenant_id, &window).await })
            .await
    }

    /// Applies a partial update to a role.
    pub async fn update_role(
        &self,
        actor: &AdminIdentity,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<RoleRecord> {
        let mut record = self.get_role(actor, role_id).await?;

        if let Some(name) = input.name {
            record.name = required_text(name, "role name", ROLE_NAME_MAX_LENGTH)?;
        }
        if let Some(description) = input.description {
            record.description = optional_text(
                Some(description),
                "role description",
                ROLE_DESCRIPTION_MAX_LENGTH,
            )?;
        }
        if let Some(permissions) = input.permissions {
            record.grants = parse_grants(&permissions)?;
        }

        record.updated_by = actor.subject().to_owned();
        record.updated_at = Utc::now();

        self.repository.update_role(record.clone()).await?;
        self.append_role_event(actor, AuditAction::RoleUpdated, &record)
            .await?;

        Ok(record)
    }

    /// Soft-deletes a role that no live admin holds.
    pub async fn delete_role(&self, actor: &AdminIdentity, role_id: RoleId) -> AppResult<()> {
        let record = self.get_role(actor, role_id).await?;

        let holders = self
            .admin_user_repository
            .count_admin_users_with_role(actor.tenant_id(), role_id)
            .await?;
        if holders > 0 {
            return Err(AppError::Conflict(format!(
                "role '{}' is assigned to {holders} admin(s)",
                record.name
            )));
        }

        self.repository
            .soft_delete_role(actor.tenant_id(), role_id, actor.subject())
            .await?;
        self.append_role_event(actor, AuditAction::RoleDeleted, &record)
            .await
    }

    async fn append_role_event(
        &self,
        actor: &AdminIdentity,
        action: AuditAction,
        record: &RoleRecord,
    ) -> AppResult<()> {
        let grants = record
            .grants
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action,
                resource_type: "role".to_owned(),
                resource_id: record.id.to_string(),
                detail: Some(format!("name={} grants=[{grants}]", record.name)),
            })
            .await
    }
}

/// Parses wire grants, keeping first occurrences in order.
fn parse_grants(values: &[String]) -> AppResult<Vec<Grant>> {
    let mut grants = Vec::with_capacity(values.len());
    for value in values {
        let grant = Grant::from_transport(value.trim())?;
        if !grants.contains(&grant) {
            grants.push(grant);
        }
    }

    Ok(grants)
}
