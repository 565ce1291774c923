use async_trait::async_trait;
use atrium_core::{AppResult, TenantId};
use atrium_domain::{PageId, PageStatus};
use chrono::{DateTime, Utc};

use crate::pagination::{CursorKeyed, CursorKind, CursorValue, KeysetWindow, PaginationKey};

/// Localized page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTranslationRecord {
    /// Locale code, unique per page.
    pub locale: String,
    /// Localized title.
    pub title: String,
    /// Localized body.
    pub content: String,
}

/// CMS page as stored by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Unique page identifier.
    pub id: PageId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Slug, unique among live pages of the tenant.
    pub slug: String,
    /// Optional SEO keywords.
    pub meta_keywords: Option<String>,
    /// Optional SEO description.
    pub meta_description: Option<String>,
    /// Publication state.
    pub status: PageStatus,
    /// Translations ordered by locale.
    pub translations: Vec<PageTranslationRecord>,
    /// Subject that created the page.
    pub created_by: String,
    /// Subject that last changed the page.
    pub updated_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Ordering keys of page listings.
pub const PAGE_PAGINATION_KEYS: [PaginationKey; 2] = [
    PaginationKey::required("created_at", CursorKind::Timestamp),
    PaginationKey::required("id", CursorKind::Uuid),
];

impl CursorKeyed for PageRecord {
    fn cursor_value(&self, column: &str) -> Option<CursorValue> {
        match column {
            "created_at" => Some(CursorValue::Timestamp(self.created_at)),
            "id" => Some(CursorValue::Uuid(self.id.as_uuid())),
            _ => None,
        }
    }
}

/// Filters for page listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageListFilter {
    /// Only pages in this state.
    pub status: Option<PageStatus>,
}

/// Repository port for pages. Soft-deleted rows are invisible.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Inserts a page with its translations. Fails with `Conflict` on a taken slug.
    async fn create_page(&self, record: PageRecord) -> AppResult<()>;

    /// Finds a live page by id.
    async fn find_page(&self, tenant_id: TenantId, page_id: PageId)
    -> AppResult<Option<PageRecord>>;

    /// Finds a live page by slug.
    async fn find_page_by_slug(
        &self,
        tenant_id: TenantId,
        slug: &str,
    ) -> AppResult<Option<PageRecord>>;

    /// Lists live pages of a tenant inside the keyset window.
    async fn list_pages(
        &self,
        tenant_id: TenantId,
        filter: PageListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PageRecord>>;

    /// Persists the mutable columns and translations of an existing page.
    async fn update_page(&self, record: PageRecord) -> AppResult<()>;

    /// Soft-deletes a page.
    async fn soft_delete_page(
        &self,
        tenant_id: TenantId,
        page_id: PageId,
        deleted_by: &str,
    ) -> AppResult<()>;
}
