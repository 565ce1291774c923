use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use atrium_core::{AppError, AppResult};
use atrium_domain::{Action, AdminIdentity, Subject};

use super::{Ability, AuthorizationService};

/// Pure check evaluated against a resolved ability.
pub type PolicyPredicate = Arc<dyn Fn(&Ability) -> bool + Send + Sync>;

/// Predicate granting access when the ability holds `action` on `subject`.
#[must_use]
pub fn requires(action: Action, subject: Subject) -> PolicyPredicate {
    Arc::new(move |ability: &Ability| ability.can(action, subject))
}

/// Access rule attached to a route.
#[derive(Clone)]
pub enum RouteAccess {
    /// Reachable without a principal.
    Public,
    /// Requires a principal and every predicate to pass.
    Guarded(Vec<PolicyPredicate>),
}

impl RouteAccess {
    /// Requires only an authenticated principal.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::Guarded(Vec::new())
    }

    /// Requires a single grant.
    #[must_use]
    pub fn requires(action: Action, subject: Subject) -> Self {
        Self::Guarded(vec![requires(action, subject)])
    }

    /// Returns whether the route skips authorization.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl Debug for RouteAccess {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => formatter.write_str("Public"),
            Self::Guarded(predicates) => write!(formatter, "Guarded({} predicates)", predicates.len()),
        }
    }
}

/// Outcome of a successful gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Public route; no ability was resolved.
    Public,
    /// Guarded route; the resolved ability is available to handlers.
    Allowed(Ability),
}

/// Request-time policy gate.
#[derive(Clone)]
pub struct PolicyGate {
    authorization_service: AuthorizationService,
}

impl PolicyGate {
    /// Creates a gate backed by the authorization service.
    #[must_use]
    pub fn new(authorization_service: AuthorizationService) -> Self {
        Self {
            authorization_service,
        }
    }

    /// Decides whether a request may reach the route handler.
    pub async fn evaluate(
        &self,
        access: &RouteAccess,
        principal: Option<&AdminIdentity>,
    ) -> AppResult<GateDecision> {
        let predicates = match access {
            RouteAccess::Public => return Ok(GateDecision::Public),
            RouteAccess::Guarded(predicates) => predicates,
        };

        let Some(principal) = principal else {
            return Err(AppError::Unauthorized(
                "authentication required".to_owned(),
            ));
        };

        let ability = self.authorization_service.resolve_ability(principal).await?;

        if predicates.iter().all(|predicate| predicate(&ability)) {
            return Ok(GateDecision::Allowed(ability));
        }

        tracing::info!(
            subject = principal.subject(),
            tenant_id = %principal.tenant_id(),
            "policy gate denied request"
        );

        Err(AppError::Forbidden("access denied".to_owned()))
    }
}
