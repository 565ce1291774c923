use std::sync::Arc;

use async_trait::async_trait;
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{AdminIdentity, AdminUserId, Grant, RoleId};

mod ability;
mod policy;

#[cfg(test)]
mod tests;

pub use ability::{Ability, resolve_grants};
pub use policy::{GateDecision, PolicyGate, PolicyPredicate, RouteAccess, requires};

/// Role grants loaded for one admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalGrants {
    /// No live admin record exists for the principal.
    UnknownPrincipal,
    /// The admin references a role that no longer exists.
    MissingRole {
        /// Dangling role reference.
        role_id: RoleId,
    },
    /// Grants of the admin's role.
    Resolved {
        /// Role that holds the grants.
        role_id: RoleId,
        /// Stored grants.
        grants: Vec<Grant>,
    },
}

/// Repository port for grant lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Loads the grants of the role assigned to an admin.
    async fn find_grants_for_admin(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<PrincipalGrants>;
}

/// Application service resolving principals into abilities.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the ability of an authenticated principal.
    pub async fn resolve_ability(&self, principal: &AdminIdentity) -> AppResult<Ability> {
        let admin_id = principal.admin_id();
        let grants = self
            .repository
            .find_grants_for_admin(principal.tenant_id(), admin_id)
            .await
            .map_err(|error| {
                tracing::error!(
                    subject = principal.subject(),
                    error = %error,
                    "failed to load role grants"
                );
                match error {
                    AppError::Configuration(_) => error,
                    other => AppError::Configuration(format!("role grants unavailable: {other}")),
                }
            })?;

        match grants {
            PrincipalGrants::UnknownPrincipal => Err(AppError::Unauthorized(
                "principal no longer exists".to_owned(),
            )),
            PrincipalGrants::MissingRole { role_id } => {
                tracing::error!(
                    subject = principal.subject(),
                    role_id = %role_id,
                    "admin references a missing role"
                );
                Err(AppError::Configuration(format!(
                    "role '{role_id}' assigned to the principal does not exist"
                )))
            }
            PrincipalGrants::Resolved { grants, .. } => Ok(resolve_grants(admin_id, &grants)),
        }
    }
}
