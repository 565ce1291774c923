use std::collections::BTreeMap;
use std::sync::Arc;

use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{
    AdminIdentity, AuditAction, LocaleCode, META_DESCRIPTION_MAX_LENGTH, META_KEYWORDS_MAX_LENGTH,
    PageId, PageSlug, PageStatus,
};
use chrono::Utc;

use crate::inputs::{optional_text, required_text};
use crate::pagination::{CursorPage, CursorPageRequest, PaginationSettings};
use crate::{
    AuditEvent, AuditRepository, PAGE_PAGINATION_KEYS, PageListFilter, PageRecord, PageRepository,
    PageTranslationRecord,
};


/// Maximum length of a translated page title.
pub const PAGE_TITLE_MAX_LENGTH: usize = 200;

/// Maximum length of translated page content.
pub const PAGE_CONTENT_MAX_LENGTH: usize = 100_000;

/// One translation submitted with a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTranslationInput {
    /// Locale code.
    pub locale: String,
    /// Localized title.
    pub title: String,
    /// Localized body.
    pub content: String,
}

/// Input for creating a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePageInput {
    /// URL slug.
    pub slug: String,
    /// Optional SEO keywords.
    pub meta_keywords: Option<String>,
    /// Optional SEO description.
    pub meta_description: Option<String>,
    /// Initial publication state.
    pub status: PageStatus,
    /// At least one translation.
    pub translations: Vec<PageTranslationInput>,
}

/// Partial update of a page. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePageInput {
    /// New slug.
    pub slug: Option<String>,
    /// New SEO keywords; empty clears them.
    pub meta_keywords: Option<String>,
    /// New SEO description; empty clears it.
    pub meta_description: Option<String>,
    /// New publication state.
    pub status: Option<PageStatus>,
    /// Replacement translations.
    pub translations: Option<Vec<PageTranslationInput>>,
}

/// Application service for CMS pages.
#[derive(Clone)]
pub struct PageService {
    repository: Arc<dyn PageRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    pagination: PaginationSettings,
}

impl PageService {
    /// Creates a new page service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PageRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            repository,
            audit_repository,
            pagination,
        }
    }

    /// Creates a page in the actor's tenant.
    pub async fn create_page(
        &self,
        actor: &AdminIdentity,
        input: CreatePageInput,
    ) -> AppResult<PageRecord> {
        let slug = PageSlug::new(input.slug)?;
        if self
            .repository
            .find_page_by_slug(actor.tenant_id(), slug.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "a page with slug '{}' already exists",
                slug.as_str()
            )));
        }

        let now = Utc::now();
        let record = PageRecord {
            id: PageId::new(),
            tenant_id: actor.tenant_id(),
            slug: slug.into(),
            meta_keywords: optional_text(
                input.meta_keywords,
                "meta keywords",
                META_KEYWORDS_MAX_LENGTH,
            )?,
            meta_description: optional_text(
                input.meta_description,
                "meta description",
                META_DESCRIPTION_MAX_LENGTH,
            )?,
            status: input.status,
            translations: normalize_translations(input.translations)?,
            created_by: actor.subject().to_owned(),
            updated_by: actor.subject().to_owned(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create_page(record.clone()).await?;
        self.append_page_event(actor, AuditAction::PageCreated, &record)
            .await?;

        Ok(record)
    }

    /// Lists one page of published pages for public readers.
    pub async fn list_published_pages(
        &self,
        tenant_id: TenantId,
        request: CursorPageRequest,
    ) -> AppResult<CursorPage<PageRecord>> {
        let paginator = self
            .pagination
            .paginator(PAGE_PAGINATION_KEYS.to_vec(), request)?;
        let filter = PageListFilter {
            status: Some(PageStatus::Published),
        };

        paginator
            .paginate(|window| async move {
                self.repository.list_pages(tenant_id, filter, &window).await
            })
            .await
    }

    /// Returns a published page by slug.
    pub async fn get_published_page(&self, tenant_id: TenantId, slug: &str) -> AppResult<PageRecord> {
        self.repository
            .find_page_by_slug(tenant_id, slug.trim())
            .await?
            .filter(|page| page.status == PageStatus::Published)
            .ok_or_else(|| AppError::NotFound(format!("page '{slug}' does not exist")))
    }

    /// Applies a partial update to a page.
    pub async fn update_page(
        &self,
        actor: &AdminIdentity,
        page_id: PageId,
        input: UpdatePageInput,
    ) -> AppResult<PageRecord> {
        let mut record = self.get_page(actor, page_id).await?;

        if let Some(slug) = input.slug {
            let slug = PageSlug::new(slug)?;
            let taken = self
                .repository
                .find_page_by_slug(actor.tenant_id(), slug.as_str())
                .await?
                .is_some_and(|existing| existing.id != page_id);
            if taken {
                return Err(AppError::Conflict(format!(
                    "a page with slug '{}' already exists",
                    slug.as_str()
                )));
            }
            record.slug = slug.into();
        }

        if let Some(meta_keywords) = input.meta_keywords {
            record.meta_keywords = optional_text(
                Some(meta_keywords),
                "meta keywords",
                META_KEYWORDS_MAX_LENGTH,
            )?;
        }
        if let Some(meta_description) = input.meta_description {
            record.meta_description = optional_text(
                Some(meta_description),
                "meta description",
                META_DESCRIPTION_MAX_LENGTH,
            )?;
        }
        if let Some(status) = input.status {
            record.status = status;
        }
        if let Some(translations) = input.translations {
            record.translations = normalize_translations(translations)?;
        }

        record.updated_by = actor.subject().to_owned();
        record.updated_at = Utc::now();

        self.repository.update_page(record.clone()).await?;
        self.append_page_event(actor, AuditAction::PageUpdated, &record)
            .await?;

        Ok(record)
    }

    /// Soft-deletes a page.
    pub async fn delete_page(&self, actor: &AdminIdentity, page_id: PageId) -> AppResult<()> {
        let record = self.get_page(actor, page_id).await?;
        self.repository
            .soft_delete_page(actor.tenant_id(), page_id, actor.subject())
            .await?;
        self.append_page_event(actor, AuditAction::PageDeleted, &record)
            .await
    }

    async fn get_page(&self, actor: &AdminIdentity, page_id: PageId) -> AppResult<PageRecord> {
        self.repository
            .find_page(actor.tenant_id(), page_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("page '{page_id}' does not exist")))
    }

    async fn append_page_event(
        &self,
        actor: &AdminIdentity,
        action: AuditAction,
        record: &PageRecord,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action,
                resource_type: "page".to_owned(),
                resource_id: record.id.to_string(),
                detail: Some(format!(
                    "slug={} status={}",
                    record.slug,
                    record.status.as_str()
                )),
            })
            .await
    }
}

/// Validates translations and orders them by locale.
fn normalize_translations(
    translations: Vec<PageTranslationInput>,
) -> AppResult<Vec<PageTranslationRecord>> {
    if translations.is_empty() {
        return Err(AppError::Validation(
            "a page needs at least one translation".to_owned(),
        ));
    }

    let mut by_locale = BTreeMap::new();
    for translation in translations {
        let locale = String::from(LocaleCode::new(translation.locale)?);
        let record = PageTranslationRecord {
            locale: locale.clone(),
            title: required_text(translation.title, "title", PAGE_TITLE_MAX_LENGTH)?,
            content: required_text(translation.content, "content", PAGE_CONTENT_MAX_LENGTH)?,
        };

        if by_locale.insert(locale.clone(), record).is_some() {
            return Err(AppError::Validation(format!(
                "locale '{locale}' is listed more than once"
            )));
        }
    }

    Ok(by_locale.into_values().collect())
}
