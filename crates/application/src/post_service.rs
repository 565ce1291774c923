//! Posts written by end users and curated by admins.

use std::sync::Arc;

use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{AdminIdentity, AuditAction, PageSlug, PostId, UserId, slug_from_title};
use chrono::Utc;

use crate::inputs::{optional_text, required_text};
use crate::pagination::{CursorPage, CursorPageRequest, PaginationSettings};
use crate::{
    AuditEvent, AuditRepository, POST_PAGINATION_KEYS, PostListFilter, PostRecord, PostRepository,
    UserRepository,
};

#[cfg(test)]
mod tests;

/// Maximum length of a post title.
pub const POST_TITLE_MAX_LENGTH: usize = 200;

/// Maximum length of a post description.
pub const POST_DESCRIPTION_MAX_LENGTH: usize = 1_000;

/// Maximum length of a post body.
pub const POST_CONTENT_MAX_LENGTH: usize = 100_000;

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostInput {
    /// Authoring end user.
    pub author_id: UserId,
    /// Title.
    pub title: String,
    /// Slug; derived from the title when absent.
    pub slug: Option<String>,
    /// Optional summary.
    pub description: Option<String>,
    /// Optional body.
    pub content: Option<String>,
}

/// Partial update of a post. `None` keeps the current value and an empty
/// string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePostInput {
    /// New title.
    pub title: Option<String>,
    /// New slug.
    pub slug: Option<String>,
    /// New summary.
    pub description: Option<String>,
    /// New body.
    pub content: Option<String>,
}

/// Application service for posts.
#[derive(Clone)]
pub struct PostService {
    repository: Arc<dyn PostRepository>,
    user_repository: Arc<dyn UserRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    pagination: PaginationSettings,
}

impl PostService {
    /// Creates a new post service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PostRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            repository,
            user_repository,
            audit_repository,
            pagination,
        }
    }

    /// Creates a post for an existing user of the actor's tenant.
    pub async fn create_post(
        &self,
        actor: &AdminIdentity,
        input: CreatePostInput,
    ) -> AppResult<PostRecord> {
        let title = required_text(input.title, "post title", POST_TITLE_MAX_LENGTH)?;
        let slug = match input.slug.filter(|slug| !slug.trim().is_empty()) {
            Some(slug) => PageSlug::new(slug)?,
            None => slug_from_title(&title)?,
        };
        let description = optional_text(
            input.description,
            "post description",
            POST_DESCRIPTION_MAX_LENGTH,
        )?;
        let content = optional_text(input.content, "post content", POST_CONTENT_MAX_LENGTH)?;

        if self
            .user_repository
            .find_user(actor.tenant_id(), input.author_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "author '{}' does not exist",
                input.author_id
            )));
        }

        let now = Utc::now();
        let record = PostRecord {
            id: PostId::new(),
            tenant_id: actor.tenant_id(),
            author_id: input.author_id,
            title,
            slug: slug.into(),
            description,
            content,
            created_by: actor.subject().to_owned(),
            updated_by: actor.subject().to_owned(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create_post(record.clone()).await?;
        self.append_post_event(actor, AuditAction::PostCreated, &record)
            .await?;

        Ok(record)
    }

    /// Returns one post of the actor's tenant.
    pub async fn get_post(&self, actor: &AdminIdentity, post_id: PostId) -> AppResult<PostRecord> {
        self.repository
            .find_post(actor.tenant_id(), post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post '{post_id}' does not exist")))
    }

    /// Lists one page of a tenant's posts for public readers.
    pub async fn list_posts(
        &self,
        tenant_id: TenantId,
        title: Option<String>,
        request: CursorPageRequest,
    ) -> AppResult<CursorPage<PostRecord>> {
        let paginator = self
            .pagination
            .paginator(POST_PAGINATION_KEYS.to_vec(), request)?;
        let filter = PostListFilter {
            title: title
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
        };
        let filter = &filter;

        paginator
            .paginate(|window| async move {
                self.repository.list_posts(tenant_id, filter, &window).await
            })
            .await
    }

    /// Applies a partial update to a post.
    pub async fn update_post(
        &self,
        actor: &AdminIdentity,
        post_id: PostId,
        input: UpdatePostInput,
    ) -> AppResult<PostRecord> {
        let mut record = self.get_post(actor, post_id).await?;

        if let Some(title) = input.title {
            record.title = required_text(title, "post title", POST_TITLE_MAX_LENGTH)?;
        }
        if let Some(slug) = input.slug {
            record.slug = PageSlug::new(slug)?.into();
        }
        if let Some(description) = input.description {
            record.description = optional_text(
                Some(description),
                "post description",
                POST_DESCRIPTION_MAX_LENGTH,
            )?;
        }
        if let Some(content) = input.content {
            record.content =
                optional_text(Some(content), "post content", POST_CONTENT_MAX_LENGTH)?;
        }

        record.updated_by = actor.subject().to_owned();
        record.updated_at = Utc::now();

        self.repository.update_post(record.clone()).await?;
        self.append_post_event(actor, AuditAction::PostUpdated, &record)
            .await?;

        Ok(record)
    }

    /// Soft-deletes a post.
    pub async fn delete_post(&self, actor: &AdminIdentity, post_id: PostId) -> AppResult<()> {
        let record = self.get_post(actor, post_id).await?;

        self.repository
            .soft_delete_post(actor.tenant_id(), post_id, actor.subject())
            .await?;
        self.append_post_event(actor, AuditAction::PostDeleted, &record)
            .await
    }

    async fn append_post_event(
        &self,
        actor: &AdminIdentity,
        action: AuditAction,
        record: &PostRecord,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action,
                resource_type: "post".to_owned(),
                resource_id: record.id.to_string(),
                detail: Some(format!("slug={} author={}", record.slug, record.author_id)),
            })
            .await
    }
}
