use atrium_application::pagination::{CursorPageRequest, CursorPaginator, SortOrder};
use atrium_application::{
    ADMIN_USER_PAGINATION_KEYS, AdminUserRecord, AdminUserRepository, RoleRepository,
};
use atrium_core::{AppError, TenantId};
use atrium_domain::{AdminUserId, RoleId};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::postgres_role_repository::PostgresRoleRepository;
use crate::postgres_test_pool::test_pool;

use super::PostgresAdminUserRepository;

async fn seed_role(pool: &sqlx::PgPool, tenant_id: TenantId) -> RoleId {
    let now = Utc::now();
    let role_id = RoleId::new();
    let created = PostgresRoleRepository::new(pool.clone())
        .create_role(atrium_application::RoleRecord {
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
    assert!(created.is_ok());
    role_id
}

fn admin(tenant_id: TenantId, role_id: RoleId, email: &str, seconds_ago: i64) -> AdminUserRecord {
    let created_at = Utc::now() - Duration::seconds(seconds_ago);
    AdminUserRecord {
        id: AdminUserId::new(),
        tenant_id,
        username: None,
        email: email.to_owned(),
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
        created_at,
        updated_at: created_at,
    }
}

fn unique_email(label: &str) -> String {
    format!("{label}-{}@example.com", Uuid::new_v4().simple())
}

#[tokio::test]
async fn email_is_unique_among_live_admins() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresAdminUserRepository::new(pool.clone());
    let tenant_id = TenantId::new();
    let role_id = seed_role(&pool, tenant_id).await;
    let email = unique_email("unique");
    let first = admin(tenant_id, role_id, &email, 0);

    assert!(repository.create_admin_user(first.clone()).await.is_ok());
    let duplicate = repository
        .create_admin_user(admin(tenant_id, role_id, &email, 0))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    assert!(
        repository
            .soft_delete_admin_user(tenant_id, first.id, "tester")
            .await
            .is_ok()
    );
    assert!(matches!(
        repository.find_admin_user_by_email(&email).await,
        Ok(None)
    ));
    assert!(
        repository
            .create_admin_user(admin(tenant_id, role_id, &email, 0))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn update_and_count_by_role() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresAdminUserRepository::new(pool.clone());
    let tenant_id = TenantId::new();
    let role_id = seed_role(&pool, tenant_id).await;
    let other_role_id = seed_role(&pool, tenant_id).await;
    let mut record = admin(tenant_id, role_id, &unique_email("update"), 0);
    assert!(repository.create_admin_user(record.clone()).await.is_ok());

    record.role_id = other_role_id;
    record.bio = Some("Writes things".to_owned());
    assert!(repository.update_admin_user(record.clone()).await.is_ok());

    assert_eq!(
        repository
            .count_admin_users_with_role(tenant_id, role_id)
            .await
            .unwrap_or(usize::MAX),
        0
    );
    assert_eq!(
        repository
            .count_admin_users_with_role(tenant_id, other_role_id)
            .await
            .unwrap_or_default(),
        1
    );
    let found = repository
        .find_admin_user(tenant_id, record.id)
        .await
        .unwrap_or_default();
    assert_eq!(found.and_then(|found| found.bio), Some("Writes things".to_owned()));
}

#[tokio::test]
async fn list_admin_users_pages_backward_to_first_page() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresAdminUserRepository::new(pool.clone());
    let tenant_id = TenantId::new();
    let role_id = seed_role(&pool, tenant_id).await;
    let mut created = Vec::new();
    for seconds_ago in [50, 40, 30, 20, 10] {
        let record = admin(tenant_id, role_id, &unique_email("page"), seconds_ago);
        assert!(repository.create_admin_user(record.clone()).await.is_ok());
        created.push(record.id);
    }

    let fetch = |request: CursorPageRequest| {
        let repository = repository.clone();
        async move {
            let paginator =
                CursorPaginator::new(ADMIN_USER_PAGINATION_KEYS.to_vec(), request, 100)
                    .unwrap_or_else(|_| unreachable!());
            let rows = repository
                .list_admin_users(tenant_id, paginator.window())
                .await
                .unwrap_or_default();
            paginator.finish(rows).unwrap_or_else(|_| unreachable!())
        }
    };

    let first = fetch(CursorPageRequest {
        limit: 2,
        order: SortOrder::Ascending,
        ..CursorPageRequest::default()
    })
    .await;
    let second = fetch(CursorPageRequest {
        limit: 2,
        order: SortOrder::Ascending,
        after_cursor: first.cursor.after_cursor.clone(),
        ..CursorPageRequest::default()
    })
    .await;
    let back = fetch(CursorPageRequest {
        limit: 2,
        order: SortOrder::Ascending,
        before_cursor: second.cursor.before_cursor.clone(),
        ..CursorPageRequest::default()
    })
    .await;

    let ids = |page: &atrium_application::pagination::CursorPage<AdminUserRecord>| {
        page.data.iter().map(|record| record.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), created[..2].to_vec());
    assert_eq!(ids(&second), created[2..4].to_vec());
    assert_eq!(ids(&back), ids(&first));
    assert_eq!(back.cursor.before_cursor, None);
}
