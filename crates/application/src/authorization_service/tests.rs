use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{Action, AdminIdentity, AdminUserId, Grant, RoleId, Subject};

use super::{
    AuthorizationRepository, AuthorizationService, GateDecision, PolicyGate, PrincipalGrants,
    RouteAccess, requires, resolve_grants,
};

#[derive(Default)]
struct FakeAuthorizationRepository {
    map: HashMap<AdminUserId, PrincipalGrants>,
    fail: bool,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn find_grants_for_admin(
        &self,
        _tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<PrincipalGrants> {
        if self.fail {
            return Err(AppError::Internal("connection reset".to_owned()));
        }

        Ok(self
            .map
            .get(&admin_id)
            .cloned()
            .unwrap_or(PrincipalGrants::UnknownPrincipal))
    }
}

fn identity(admin_id: AdminUserId) -> AdminIdentity {
    AdminIdentity::new(admin_id, "Jane Doe", None, TenantId::new())
}

fn gate_with(admin_id: AdminUserId, grants: PrincipalGrants) -> PolicyGate {
    let repository = FakeAuthorizationRepository {
        map: HashMap::from([(admin_id, grants)]),
        fail: false,
    };
    PolicyGate::new(AuthorizationService::new(Arc::new(repository)))
}

fn resolved(grants: Vec<Grant>) -> PrincipalGrants {
    PrincipalGrants::Resolved {
        role_id: RoleId::new(),
        grants,
    }
}

#[test]
fn manage_all_grants_everything() {
    let ability = resolve_grants(AdminUserId::new(), &[Grant::MANAGE_ALL]);

    assert!(ability.has_full_access());
    assert!(ability.can(Action::Delete, Subject::Page));
    assert!(ability.can(Action::Manage, Subject::All));
}

#[test]
fn manage_subject_grants_every_action_on_subject_only() {
    let ability = resolve_grants(
        AdminUserId::new(),
        &[Grant::new(Action::Manage, Subject::Page)],
    );

    assert!(ability.can(Action::Create, Subject::Page));
    assert!(ability.can(Action::Delete, Subject::Page));
    assert!(ability.cannot(Action::Read, Subject::Role));
}

#[test]
fn expanded_grants_are_listed_in_stable_order() {
    let ability = resolve_grants(
        AdminUserId::new(),
        &[
            Grant::new(Action::Read, Subject::Log),
            Grant::new(Action::Manage, Subject::Page),
        ],
    );

    let listed: Vec<String> = ability.grants().map(|grant| grant.to_string()).collect();
    assert_eq!(
        listed,
        vec![
            "create:Page",
            "read:Log",
            "read:Page",
            "update:Page",
            "delete:Page",
            "manage:Page",
        ]
    );
    assert!(!ability.has_full_access());
}

#[test]
fn action_on_all_grants_action_on_every_subject() {
    let ability = resolve_grants(AdminUserId::new(), &[Grant::new(Action::Read, Subject::All)]);

    assert!(ability.can(Action::Read, Subject::Admin));
    assert!(ability.can(Action::Read, Subject::Log));
    assert!(ability.cannot(Action::Update, Subject::Admin));
}

#[test]
fn empty_grants_allow_nothing_but_own_profile() {
    let admin_id = AdminUserId::new();
    let ability = resolve_grants(admin_id, &[]);

    assert!(ability.cannot(Action::Read, Subject::Admin));
    assert!(ability.can_on_admin(Action::Read, admin_id));
    assert!(ability.can_on_admin(Action::Update, admin_id));
    assert!(!ability.can_on_admin(Action::Delete, admin_id));
    assert!(!ability.can_on_admin(Action::Update, AdminUserId::new()));
}

#[test]
fn read_user_grant_allows_only_reading_users() {
    let ability = resolve_grants(AdminUserId::new(), &[Grant::new(Action::Read, Subject::User)]);

    assert!(ability.can(Action::Read, Subject::User));
    assert!(!ability.can(Action::Update, Subject::User));
    assert!(!ability.can(Action::Read, Subject::Role));
}

#[tokio::test]
async fn read_user_grant_passes_only_the_read_user_route() {
    let admin_id = AdminUserId::new();
    let gate = gate_with(
        admin_id,
        resolved(vec![Grant::new(Action::Read, Subject::User)]),
    );
    let principal = identity(admin_id);

    let read_users = gate
        .evaluate(
            &RouteAccess::requires(Action::Read, Subject::User),
            Some(&principal),
        )
        .await;
    let update_users = gate
        .evaluate(
            &RouteAccess::requires(Action::Update, Subject::User),
            Some(&principal),
        )
        .await;
    let read_roles = gate
        .evaluate(
            &RouteAccess::requires(Action::Read, Subject::Role),
            Some(&principal),
        )
        .await;

    assert!(matches!(read_users, Ok(GateDecision::Allowed(_))));
    assert!(matches!(update_users, Err(AppError::Forbidden(_))));
    assert!(matches!(read_roles, Err(AppError::Forbidden(_))));
}

#[test]
fn update_admin_grant_covers_other_admins() {
    let ability = resolve_grants(
        AdminUserId::new(),
        &[Grant::new(Action::Update, Subject::Admin)],
    );

    assert!(ability.can_on_admin(Action::Update, AdminUserId::new()));
}

#[tokio::test]
async fn public_route_skips_resolution() {
    let repository = FakeAuthorizationRepository {
        map: HashMap::new(),
        fail: true,
    };
    let gate = PolicyGate::new(AuthorizationService::new(Arc::new(repository)));

    let decision = gate.evaluate(&RouteAccess::Public, None).await;
    assert_eq!(decision.ok(), Some(GateDecision::Public));
}

#[tokio::test]
async fn guarded_route_without_principal_is_unauthorized() {
    let gate = gate_with(AdminUserId::new(), resolved(vec![Grant::MANAGE_ALL]));

    let decision = gate
        .evaluate(&RouteAccess::requires(Action::Read, Subject::Admin), None)
        .await;
    assert!(matches!(decision, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn guarded_route_with_grant_is_allowed() {
    let admin_id = AdminUserId::new();
    let gate = gate_with(
        admin_id,
        resolved(vec![Grant::new(Action::Read, Subject::Admin)]),
    );

    let decision = gate
        .evaluate(
            &RouteAccess::requires(Action::Read, Subject::Admin),
            Some(&identity(admin_id)),
        )
        .await;

    match decision {
        Ok(GateDecision::Allowed(ability)) => assert_eq!(ability.principal(), admin_id),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn failing_predicate_is_forbidden_without_details() {
    let admin_id = AdminUserId::new();
    let gate = gate_with(
        admin_id,
        resolved(vec![Grant::new(Action::Read, Subject::Admin)]),
    );

    let decision = gate
        .evaluate(
            &RouteAccess::requires(Action::Delete, Subject::Admin),
            Some(&identity(admin_id)),
        )
        .await;

    match decision {
        Err(AppError::Forbidden(message)) => assert_eq!(message, "access denied"),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn predicates_are_combined_with_and() {
    let admin_id = AdminUserId::new();
    let gate = gate_with(
        admin_id,
        resolved(vec![Grant::new(Action::Read, Subject::Role)]),
    );
    let access = RouteAccess::Guarded(vec![
        requires(Action::Read, Subject::Role),
        requires(Action::Update, Subject::Role),
    ]);

    let decision = gate.evaluate(&access, Some(&identity(admin_id))).await;
    assert!(matches!(decision, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn authenticated_route_allows_any_known_principal() {
    let admin_id = AdminUserId::new();
    let gate = gate_with(admin_id, resolved(Vec::new()));

    let decision = gate
        .evaluate(&RouteAccess::authenticated(), Some(&identity(admin_id)))
        .await;
    assert!(matches!(decision, Ok(GateDecision::Allowed(_))));
}

#[tokio::test]
async fn deleted_principal_is_unauthorized() {
    let gate = gate_with(AdminUserId::new(), resolved(vec![Grant::MANAGE_ALL]));

    let decision = gate
        .evaluate(
            &RouteAccess::authenticated(),
            Some(&identity(AdminUserId::new())),
        )
        .await;
    assert!(matches!(decision, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn missing_role_is_a_configuration_error() {
    let admin_id = AdminUserId::new();
    let gate = gate_with(
        admin_id,
        PrincipalGrants::MissingRole {
            role_id: RoleId::new(),
        },
    );

    let decision = gate
        .evaluate(&RouteAccess::authenticated(), Some(&identity(admin_id)))
        .await;
    assert!(matches!(decision, Err(AppError::Configuration(_))));
}

#[tokio::test]
async fn failed_grant_load_is_a_configuration_error() {
    let repository = FakeAuthorizationRepository {
        map: HashMap::new(),
        fail: true,
    };
    let gate = PolicyGate::new(AuthorizationService::new(Arc::new(repository)));

    let decision = gate
        .evaluate(
            &RouteAccess::authenticated(),
            Some(&identity(AdminUserId::new())),
        )
        .await;
    assert!(matches!(decision, Err(AppError::Configuration(_))));
}
