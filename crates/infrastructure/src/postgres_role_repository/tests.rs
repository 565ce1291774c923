use atrium_application::pagination::{CursorPageRequest, CursorPaginator};
use atrium_application::{ROLE_PAGINATION_KEYS, RoleRecord, RoleRepository};
use atrium_core::{AppError, TenantId};
use atrium_domain::{Action, Grant, RoleId, Subject};
use chrono::{Duration, Utc};

use crate::postgres_test_pool::test_pool;

use super::PostgresRoleRepository;

fn role(tenant_id: TenantId, name: &str, minutes_ago: i64) -> RoleRecord {
    let created_at = Utc::now() - Duration::minutes(minutes_ago);
    RoleRecord {
        id: RoleId::new(),
        tenant_id,
        name: name.to_owned(),
        description: None,
        grants: vec![Grant::new(Action::Read, Subject::Page)],
        created_by: "tester".to_owned(),
        updated_by: "tester".to_owned(),
        created_at,
        updated_at: created_at,
    }
}

#[tokio::test]
async fn create_find_and_rename_role() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);
    let tenant_id = TenantId::new();
    let mut record = role(tenant_id, "Editors", 0);

    assert!(repository.create_role(record.clone()).await.is_ok());
    let duplicate = repository
        .create_role(RoleRecord {
            id: RoleId::new(),
            ..record.clone()
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    record.name = "Writers".to_owned();
    record.grants = vec![Grant::MANAGE_ALL];
    assert!(repository.update_role(record.clone()).await.is_ok());

    let found = repository
        .find_role(tenant_id, record.id)
        .await
        .unwrap_or_default()
        .map(|found| (found.name, found.grants));
    assert_eq!(found, Some(("Writers".to_owned(), vec![Grant::MANAGE_ALL])));
}

#[tokio::test]
async fn soft_deleted_role_frees_its_name() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);
    let tenant_id = TenantId::new();
    let record = role(tenant_id, "Temporary", 0);

    assert!(repository.create_role(record.clone()).await.is_ok());
    assert!(
        repository
            .soft_delete_role(tenant_id, record.id, "tester")
            .await
            .is_ok()
    );
    assert!(matches!(
        repository.find_role(tenant_id, record.id).await,
        Ok(None)
    ));
    assert!(
        repository
            .create_role(role(tenant_id, "Temporary", 0))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn list_roles_walks_pages_newest_first() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleRepository::new(pool);
    let tenant_id = TenantId::new();
    for (index, name) in ["oldest", "middle", "newest"].into_iter().enumerate() {
        let minutes_ago = 10 - i64::try_from(index).unwrap_or_default();
        assert!(
            repository
                .create_role(role(tenant_id, name, minutes_ago))
                .await
                .is_ok()
        );
    }

    let mut names = Vec::new();
    let mut after_cursor = None;
    loop {
        let paginator = CursorPaginator::new(
            ROLE_PAGINATION_KEYS.to_vec(),
            CursorPageRequest {
                limit: 2,
                after_cursor: after_cursor.take(),
                ..CursorPageRequest::default()
            },
            100,
        )
        .unwrap_or_else(|_| unreachable!());
        let rows = repository
            .list_roles(tenant_id, paginator.window())
            .await
            .unwrap_or_default();
        let page = paginator.finish(rows).unwrap_or_else(|_| unreachable!());
        names.extend(page.data.into_iter().map(|role| role.name));
        match page.cursor.after_cursor {
            Some(cursor) => after_cursor = Some(cursor),
            None => break,
        }
    }

    assert_eq!(names, vec!["newest", "middle", "oldest"]);
}
