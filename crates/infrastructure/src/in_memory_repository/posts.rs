use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{PostListFilter, PostRecord, PostRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{PostId, UserId};

use super::InMemoryRepository;

#[async_trait]
impl PostRepository for InMemoryRepository {
    async fn create_post(&self, record: PostRecord) -> AppResult<()> {
        let mut posts = self.posts.write().await;
        ensure_slug_available(posts.values(), &record)?;
        posts.insert(record.id, record);
        Ok(())
    }

    async fn find_post(
        &self,
        tenant_id: TenantId,
        post_id: PostId,
    ) -> AppResult<Option<PostRecord>> {
        Ok(self
            .posts
            .read()
            .await
            .get(&post_id)
            .filter(|post| post.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_posts(
        &self,
        tenant_id: TenantId,
        filter: &PostListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PostRecord>> {
        let posts = self.posts.read().await;
        window.apply(
            posts
                .values()
                .filter(|post| post.tenant_id == tenant_id && filter.matches(post))
                .cloned(),
        )
    }

    async fn count_posts_by_author(
        &self,
        tenant_id: TenantId,
        author_id: UserId,
    ) -> AppResult<usize> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .filter(|post| post.tenant_id == tenant_id && post.author_id == author_id)
            .count())
    }

    async fn update_post(&self, record: PostRecord) -> AppResult<()> {
        let mut posts = self.posts.write().await;
        if !posts
            .get(&record.id)
            .is_some_and(|existing| existing.tenant_id == record.tenant_id)
        {
            return Err(AppError::NotFound(format!(
                "post '{}' does not exist",
                record.id
            )));
        }

        ensure_slug_available(posts.values().filter(|post| post.id != record.id), &record)?;
        posts.insert(record.id, record);
        Ok(())
    }

    async fn soft_delete_post(
        &self,
        tenant_id: TenantId,
        post_id: PostId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let mut posts = self.posts.write().await;
        if !posts
            .get(&post_id)
            .is_some_and(|post| post.tenant_id == tenant_id)
        {
            return Err(AppError::NotFound(format!("post '{post_id}' does not exist")));
        }

        posts.remove(&post_id);
        tracing::debug!(post_id = %post_id, deleted_by, "post removed from memory");
        Ok(())
    }
}

fn ensure_slug_available<'a>(
    mut others: impl Iterator<Item = &'a PostRecord>,
    record: &PostRecord,
) -> AppResult<()> {
    if others.any(|post| post.tenant_id == record.tenant_id && post.slug == record.slug) {
        return Err(AppError::Conflict(format!(
            "a post with slug '{}' already exists",
            record.slug
        )));
    }

    Ok(())
}
