use std::sync::Arc;

use atrium_core::{AppError, TenantId};
use atrium_domain::{AdminIdentity, AdminUserId, UserId};
use chrono::Utc;

use crate::UserRecord;
use crate::pagination::{CursorPageRequest, PaginationSettings, SortOrder};
use crate::test_support::FakeStore;

use super::{CreatePostInput, PostService, UpdatePostInput};

fn service(store: &Arc<FakeStore>) -> PostService {
    PostService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        PaginationSettings::default(),
    )
}

fn actor(tenant_id: TenantId) -> AdminIdentity {
    AdminIdentity::new(AdminUserId::new(), "Root", None, tenant_id)
}

async fn seed_author(store: &FakeStore, tenant_id: TenantId) -> UserId {
    let now = Utc::now();
    let id = UserId::new();
    store.users.lock().await.push(UserRecord {
        id,
        tenant_id,
        username: format!("author-{id}"),
        email: format!("{id}@example.com"),
        bio: None,
        image: None,
        password_hash: "hashed".to_owned(),
        created_by: "seed".to_owned(),
        updated_by: "seed".to_owned(),
        created_at: now,
        updated_at: now,
    });
    id
}

fn post_input(author_id: UserId, title: &str) -> CreatePostInput {
    CreatePostInput {
        author_id,
        title: title.to_owned(),
        slug: None,
        description: None,
        content: Some("Body".to_owned()),
    }
}

#[tokio::test]
async fn create_post_derives_slug_from_title() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let author_id = seed_author(&store, tenant_id).await;

    let post = service(&store)
        .create_post(&actor(tenant_id), post_input(author_id, " Rust, in Practice "))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(post.title, "Rust, in Practice");
    assert_eq!(post.slug, "rust-in-practice");
    assert_eq!(post.author_id, author_id);
    assert_eq!(store.event_actions().await, vec!["post.created"]);
}

#[tokio::test]
async fn create_post_requires_an_author_of_the_same_tenant() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let foreign_author = seed_author(&store, TenantId::new()).await;

    let result = service(&store)
        .create_post(&actor(tenant_id), post_input(foreign_author, "Hello"))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(store.posts.lock().await.is_empty());
}

#[tokio::test]
async fn explicit_slug_is_validated_and_unique() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let author_id = seed_author(&store, tenant_id).await;
    let service = service(&store);
    let actor = actor(tenant_id);

    let invalid = service
        .create_post(
            &actor,
            CreatePostInput {
                slug: Some("Not A Slug".to_owned()),
                ..post_input(author_id, "Hello")
            },
        )
        .await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));

    assert!(
        service
            .create_post(&actor, post_input(author_id, "Hello"))
            .await
            .is_ok()
    );
    let duplicate = service
        .create_post(
            &actor,
            CreatePostInput {
                slug: Some("hello".to_owned()),
                ..post_input(author_id, "Another title")
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn public_listing_filters_titles_case_insensitively() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let author_id = seed_author(&store, tenant_id).await;
    let service = service(&store);
    let actor = actor(tenant_id);
    for title in ["Async Rust", "Gardening", "Rust macros"] {
        assert!(
            service
                .create_post(&actor, post_input(author_id, title))
                .await
                .is_ok()
        );
    }

    let page = service
        .list_posts(
            tenant_id,
            Some("rust".to_owned()),
            CursorPageRequest {
                order: SortOrder::Ascending,
                ..CursorPageRequest::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    let titles: Vec<&str> = page.data.iter().map(|post| post.title.as_str()).collect();
    assert_eq!(titles, vec!["Async Rust", "Rust macros"]);

    let other_tenant = service
        .list_posts(TenantId::new(), None, CursorPageRequest::default())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(other_tenant.data.is_empty());
}

#[tokio::test]
async fn update_and_delete_post() {
    let store = Arc::new(FakeStore::default());
    let tenant_id = TenantId::new();
    let author_id = seed_author(&store, tenant_id).await;
    let service = service(&store);
    let actor = actor(tenant_id);
    let post = service
        .create_post(&actor, post_input(author_id, "Draft title"))
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = service
        .update_post(
            &actor,
            post.id,
            UpdatePostInput {
                title: Some("Final title".to_owned()),
                content: Some(String::new()),
                ..UpdatePostInput::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.title, "Final title");
    assert_eq!(updated.slug, "draft-title");
    assert_eq!(updated.content, None);

    assert!(service.delete_post(&actor, post.id).await.is_ok());
    assert!(matches!(
        service.get_post(&actor, post.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(
        store.event_actions().await,
        vec!["post.created", "post.updated", "post.deleted"]
    );
}
