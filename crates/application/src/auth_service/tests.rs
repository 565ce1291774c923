use std::sync::Arc;
use std::sync::atomic::Ordering;

use atrium_core::{AppError, TenantId};
use atrium_domain::{AdminUserId, Grant};
use chrono::{Duration, Utc};

use crate::test_support::{FakeStore, PlainPasswordHasher, PlainTokenCodec};

use super::{
    AuthService, AuthSettings, BootstrapInput, BootstrapSettings, LoginResult,
    SUPER_ADMIN_ROLE_NAME,
};

fn service(store: &Arc<FakeStore>, tenant_id: TenantId, token: Option<&str>) -> AuthService {
    AuthService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(PlainPasswordHasher),
        Arc::new(PlainTokenCodec),
        store.clone(),
        AuthSettings {
            bootstrap: BootstrapSettings {
                token: token.map(str::to_owned),
                tenant_id,
            },
            refresh_token_ttl: Duration::days(30),
        },
    )
}

fn bootstrap_input(token: &str) -> BootstrapInput {
    BootstrapInput {
        token: token.to_owned(),
        email: "Owner@Example.com".to_owned(),
        password: "a long enough passphrase".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Owner".to_owned(),
        username: None,
    }
}

#[tokio::test]
async fn bootstrap_creates_super_admin_role_and_first_admin() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();

    let admin = service(&store, tenant_id, Some("secret"))
        .bootstrap(bootstrap_input("secret"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(admin.email, "owner@example.com");
    assert_eq!(admin.tenant_id, tenant_id);

    let roles = store.roles.lock().await;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, SUPER_ADMIN_ROLE_NAME);
    assert_eq!(roles[0].grants, vec![Grant::MANAGE_ALL]);
    assert_eq!(roles[0].id, admin.role_id);
    drop(roles);

    assert_eq!(store.event_actions().await, vec!["tenant.bootstrapped"]);
}

#[tokio::test]
async fn bootstrap_rejects_wrong_token() {
    let store = Arc::new(FakeStore::default());

    let result = service(&store, TenantId::new(), Some("secret"))
        .bootstrap(bootstrap_input("guess"))
        .await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn bootstrap_is_disabled_without_token() {
    let store = Arc::new(FakeStore::default());

    let result = service(&store, TenantId::new(), None)
        .bootstrap(bootstrap_input("secret"))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn bootstrap_runs_once_per_tenant() {
    let store = Arc::new(FakeStore::default());
    let service = service(&store, TenantId::new(), Some("secret"));

    assert!(service.bootstrap(bootstrap_input("secret")).await.is_ok());
    let second = service.bootstrap(bootstrap_input("secret")).await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn taken_username_leaves_no_role_behind() {
    let store = Arc::new(FakeStore::default());
    let first_tenant = TenantId::new();
    let second_tenant = TenantId::new();

    let first = service(&store, first_tenant, Some("secret"))
        .bootstrap(BootstrapInput {
            username: Some("owner".to_owned()),
            ..bootstrap_input("secret")
        })
        .await;
    assert!(first.is_ok());

    let second = service(&store, second_tenant, Some("secret"));
    let clash = second
        .bootstrap(BootstrapInput {
            email: "second@example.com".to_owned(),
            username: Some("owner".to_owned()),
            ..bootstrap_input("secret")
        })
        .await;
    assert!(matches!(clash, Err(AppError::Conflict(message)) if message.contains("username")));
    assert!(
        store
            .roles
            .lock()
            .await
            .iter()
            .all(|role| role.tenant_id != second_tenant)
    );

    let retry = second
        .bootstrap(BootstrapInput {
            email: "second@example.com".to_owned(),
            username: Some("other".to_owned()),
            ..bootstrap_input("secret")
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(retry.tenant_id, second_tenant);
    assert_eq!(retry.username.as_deref(), Some("other"));
}

#[tokio::test]
async fn unassigned_super_admin_role_is_reused() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let leftover = store.seed_role(tenant_id, Vec::new()).await;
    {
        let mut roles = store.roles.lock().await;
        roles[0].name = SUPER_ADMIN_ROLE_NAME.to_owned();
    }

    let admin = service(&store, tenant_id, Some("secret"))
        .bootstrap(bootstrap_input("secret"))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(admin.role_id, leftover);
    let roles = store.roles.lock().await;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].grants, vec![Grant::MANAGE_ALL]);
}

#[tokio::test]
async fn failed_admin_insert_discards_the_new_role() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let service = service(&store, tenant_id, Some("secret"));

    store.reject_admin_inserts.store(true, Ordering::SeqCst);
    let failed = service.bootstrap(bootstrap_input("secret")).await;
    assert!(matches!(failed, Err(AppError::Internal(_))));
    assert!(store.roles.lock().await.is_empty());
    assert!(store.event_actions().await.is_empty());

    store.reject_admin_inserts.store(false, Ordering::SeqCst);
    assert!(service.bootstrap(bootstrap_input("secret")).await.is_ok());
}

#[tokio::test]
async fn login_issues_token_for_valid_credentials() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let role_id = store.seed_role(tenant_id, vec![Grant::MANAGE_ALL]).await;
    let admin = store
        .seed_admin(tenant_id, role_id, "root@example.com", "root-passphrase")
        .await;
    let service = service(&store, tenant_id, None);

    let login = service
        .login("ROOT@example.com", "root-passphrase")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(login.user_id, admin.id);

    let identity = service
        .authenticate(&login.access_token)
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(identity.admin_id(), admin.id);
    assert_eq!(identity.tenant_id(), tenant_id);

    let sessions = store.sessions.lock().await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].admin_id, admin.id);
    assert!(login.refresh_token.starts_with(&sessions[0].id.to_string()));
    assert!(!sessions[0].secret_hash.is_empty());
    assert!(!login.refresh_token.contains(&sessions[0].secret_hash));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let role_id = store.seed_role(tenant_id, Vec::new()).await;
    store
        .seed_admin(tenant_id, role_id, "root@example.com", "root-passphrase")
        .await;
    let service = service(&store, tenant_id, None);

    let wrong_password = service.login("root@example.com", "nope").await;
    let unknown_email = service.login("ghost@example.com", "nope").await;
    let malformed_email = service.login("not-an-email", "nope").await;

    let messages: Vec<String> = [wrong_password, unknown_email, malformed_email]
        .into_iter()
        .map(|result| match result {
            Err(AppError::Unauthorized(message)) => message,
            _ => unreachable!(),
        })
        .collect();
    assert!(messages.iter().all(|message| message == &messages[0]));
}

async fn logged_in(store: &Arc<FakeStore>, tenant_id: TenantId) -> (AuthService, LoginResult) {
    let role_id = store.seed_role(tenant_id, vec![Grant::MANAGE_ALL]).await;
    store
        .seed_admin(tenant_id, role_id, "root@example.com", "root-passphrase")
        .await;
    let service = service(store, tenant_id, None);
    let login = service
        .login("root@example.com", "root-passphrase")
        .await
        .unwrap_or_else(|_| unreachable!());
    (service, login)
}

#[tokio::test]
async fn refresh_rotates_the_session_secret() {
    let store = Arc::new(FakeStore::default());
    let (service, login) = logged_in(&store, TenantId::new()).await;

    let refreshed = service
        .refresh(&login.refresh_token)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(refreshed.user_id, login.user_id);
    assert_ne!(refreshed.refresh_token, login.refresh_token);
    assert!(service.authenticate(&refreshed.access_token).is_ok());
    assert!(service.refresh(&refreshed.refresh_token).await.is_ok());
}

#[tokio::test]
async fn replayed_refresh_token_revokes_the_session() {
    let store = Arc::new(FakeStore::default());
    let (service, login) = logged_in(&store, TenantId::new()).await;
    let refreshed = service
        .refresh(&login.refresh_token)
        .await
        .unwrap_or_else(|_| unreachable!());

    let replay = service.refresh(&login.refresh_token).await;
    assert!(matches!(replay, Err(AppError::Unauthorized(_))));

    assert!(store.sessions.lock().await.is_empty());
    let after_revocation = service.refresh(&refreshed.refresh_token).await;
    assert!(matches!(after_revocation, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn expired_session_cannot_be_refreshed() {
    let store = Arc::new(FakeStore::default());
    let (service, login) = logged_in(&store, TenantId::new()).await;
    for session in store.sessions.lock().await.iter_mut() {
        session.expires_at = Utc::now() - Duration::seconds(1);
    }

    let result = service.refresh(&login.refresh_token).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    assert!(store.sessions.lock().await.is_empty());
}

#[tokio::test]
async fn malformed_refresh_tokens_are_unauthorized() {
    let store = Arc::new(FakeStore::default());
    let (service, login) = logged_in(&store, TenantId::new()).await;
    let session_id = login
        .refresh_token
        .split_once('.')
        .map(|(id, _)| id.to_owned())
        .unwrap_or_default();
    let empty_secret = format!("{session_id}.");

    for token in ["", "no-dot", "not-a-uuid.secret", empty_secret.as_str()] {
        let result = service.refresh(token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))), "{token}");
    }
    assert_eq!(store.sessions.lock().await.len(), 1);
}

#[tokio::test]
async fn logout_ends_only_the_actors_session() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let (service, login) = logged_in(&store, tenant_id).await;
    let admin = store.admins.lock().await[0].clone();
    let stranger = crate::test_support::identity_for(&crate::AdminUserRecord {
        id: AdminUserId::new(),
        ..admin.clone()
    });

    service
        .logout(&stranger, &login.refresh_token)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(store.sessions.lock().await.len(), 1);

    let owner = crate::test_support::identity_for(&admin);
    service
        .logout(&owner, &login.refresh_token)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(store.sessions.lock().await.is_empty());
    assert!(service.logout(&owner, &login.refresh_token).await.is_ok());

    let refresh = service.refresh(&login.refresh_token).await;
    assert!(matches!(refresh, Err(AppError::Unauthorized(_))));
}
