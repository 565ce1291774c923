use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{PageListFilter, PageRecord, PageRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::PageId;

use super::InMemoryRepository;

#[async_trait]
impl PageRepository for InMemoryRepository {
    async fn create_page(&self, record: PageRecord) -> AppResult<()> {
        let mut pages = self.pages.write().await;
        ensure_slug_available(pages.values(), &record)?;
        pages.insert(record.id, record);
        Ok(())
    }

    async fn find_page(
        &self,
        tenant_id: TenantId,
        page_id: PageId,
    ) -> AppResult<Option<PageRecord>> {
        Ok(self
            .pages
            .read()
            .await
            .get(&page_id)
            .filter(|page| page.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_page_by_slug(
        &self,
        tenant_id: TenantId,
        slug: &str,
    ) -> AppResult<Option<PageRecord>> {
        Ok(self
            .pages
            .read()
            .await
            .values()
            .find(|page| page.tenant_id == tenant_id && page.slug == slug)
            .cloned())
    }

    async fn list_pages(
        &self,
        tenant_id: TenantId,
        filter: PageListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PageRecord>> {
        let pages = self.pages.read().await;
        window.apply(
            pages
                .values()
                .filter(|page| page.tenant_id == tenant_id)
                .filter(|page| filter.status.is_none_or(|status| page.status == status))
                .cloned(),
        )
    }

    async fn update_page(&self, record: PageRecord) -> AppResult<()> {
        let mut pages = self.pages.write().await;
        if !pages
            .get(&record.id)
            .is_some_and(|existing| existing.tenant_id == record.tenant_id)
        {
            return Err(AppError::NotFound(format!(
                "page '{}' does not exist",
                record.id
            )));
        }

        ensure_slug_available(pages.values().filter(|page| page.id != record.id), &record)?;
        pages.insert(record.id, record);
        Ok(())
    }

    async fn soft_delete_page(
        &self,
        tenant_id: TenantId,
        page_id: PageId,
        _deleted_by: &str,
    ) -> AppResult<()> {
        let mut pages = self.pages.write().await;
        match pages.get(&page_id) {
            Some(page) if page.tenant_id == tenant_id => {
                pages.remove(&page_id);
                Ok(())
            }
            _ => Err(AppError::NotFound(format!("page '{page_id}' does not exist"))),
        }
    }
}

fn ensure_slug_available<'a>(
    mut others: impl Iterator<Item = &'a PageRecord>,
    record: &PageRecord,
) -> AppResult<()> {
    if others.any(|page| page.tenant_id == record.tenant_id && page.slug == record.slug) {
        return Err(AppError::Conflict(format!(
            "page slug '{}' is already taken",
            record.slug
        )));
    }

    Ok(())
}
