use atrium_application::{
    AdminUserRecord, AdminUserRepository, RoleRecord, RoleRepository, SessionRecord,
    SessionRepository,
};
use atrium_core::TenantId;
use atrium_domain::{AdminUserId, RoleId, SessionId};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::postgres_admin_user_repository::PostgresAdminUserRepository;
use crate::postgres_role_repository::PostgresRoleRepository;
use crate::postgres_test_pool::test_pool;

use super::PostgresSessionRepository;

async fn seed_admin(pool: &sqlx::PgPool, tenant_id: TenantId) -> AdminUserId {
    let now = Utc::now();
    let role_id = RoleId::new();
    let role = PostgresRoleRepository::new(pool.clone())
        .create_role(RoleRecord {
            id: role_id,
            tenant_id,
            name: format!("role-{role_id}"),
            description: None,
            grants: Vec::new(),
            created_by: "tester".to_owned(),
            updated_by: "tester".to_owned(),
            created_at: now,
            updated_at: now,
        })
        .await;
    assert!(role.is_ok());

    let admin_id = AdminUserId::new();
    let admin = PostgresAdminUserRepository::new(pool.clone())
        .create_admin_user(AdminUserRecord {
            id: admin_id,
            tenant_id,
            username: None,
            email: format!("session-{}@example.com", Uuid::new_v4().simple()),
            first_name: "Test".to_owned(),
            last_name: "Admin".to_owned(),
            full_name: "Test Admin".to_owned(),
            bio: None,
            image: None,
            phone: None,
            role_id,
            password_hash: "hash".to_owned(),
            verified_at: None,
            created_by: "tester".to_owned(),
            updated_by: "tester".to_owned(),
            created_at: now,
            updated_at: now,
        })
        .await;
    assert!(admin.is_ok());
    admin_id
}

#[tokio::test]
async fn rotation_is_compare_and_swap() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let tenant_id = TenantId::new();
    let admin_id = seed_admin(&pool, tenant_id).await;
    let repository = PostgresSessionRepository::new(pool);
    let now = Utc::now();
    let session = SessionRecord {
        id: SessionId::new(),
        tenant_id,
        admin_id,
        secret_hash: "first".to_owned(),
        expires_at: now + Duration::days(1),
        created_at: now,
        updated_at: now,
    };
    assert!(repository.create_session(session.clone()).await.is_ok());

    let expires_at = now + Duration::days(2);
    assert!(matches!(
        repository
            .rotate_session(session.id, "stale", "second".to_owned(), expires_at)
            .await,
        Ok(false)
    ));
    assert!(matches!(
        repository
            .rotate_session(session.id, "first", "second".to_owned(), expires_at)
            .await,
        Ok(true)
    ));

    let stored = repository
        .find_session(session.id)
        .await
        .unwrap_or_default()
        .map(|found| (found.admin_id, found.secret_hash));
    assert_eq!(stored, Some((admin_id, "second".to_owned())));

    assert!(repository.delete_session(session.id).await.is_ok());
    assert!(matches!(repository.find_session(session.id).await, Ok(None)));
}
