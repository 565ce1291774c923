use std::collections::HashMap;

use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{PageListFilter, PageRecord, PageRepository, PageTranslationRecord};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{PageId, PageStatus};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::postgres_keyset::{push_keyset_order_and_limit, push_keyset_predicate};


const PAGE_COLUMNS: &str = "p.id, p.tenant_id, p.slug, p.meta_keywords, p.meta_description, \
     p.status, p.created_by, p.updated_by, p.created_at, p.updated_at";

/// PostgreSQL-backed page repository storing translations in a child table.
#[derive(Clone)]
pub struct PostgresPageRepository {
    pool: PgPool,
}

impl PostgresPageRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_translations(&self, rows: Vec<PageRow>) -> AppResult<Vec<PageRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let page_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let translations = sqlx::query_as::<_, PageTranslationRow>(
            r#"
            SELECT page_id, locale, title, content
            FROM page_translations
            WHERE page_id = ANY($1)
            ORDER BY page_id, locale
            "#,
        )
        .bind(&page_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load page translations: {error}"))
        })?;

        let mut by_page: HashMap<Uuid, Vec<PageTranslationRecord>> = HashMap::new();
        for translation in translations {
            by_page
                .entry(translation.page_id)
                .or_default()
                .push(PageTranslationRecord {
                    locale: translation.locale,
                    title: translation.title,
                    content: translation.content,
                });
        }

        rows.into_iter()
            .map(|row| {
                let translations = by_page.remove(&row.id).unwrap_or_default();
                row.into_record(translations)
            })
            .collect()
    }

    async fn find_one(
        &self,
        mut builder: QueryBuilder<'_, Postgres>,
    ) -> AppResult<Option<PageRecord>> {
        let row = builder
            .build_query_as::<PageRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find page: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.attach_translations(vec![row]).await?.pop())
    }
}

#[derive(Debug, FromRow)]
struct PageRow {
    id: Uuid,
    tenant_id: Uuid,
    slug: String,
    meta_keywords: Option<String>,
    meta_description: Option<String>,
    status: String,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PageRow {
    fn into_record(self, translations: Vec<PageTranslationRecord>) -> AppResult<PageRecord> {
        let status = self.status.parse::<PageStatus>().map_err(|error| {
            AppError::Internal(format!("page '{}' has an unreadable status: {error}", self.id))
        })?;

        Ok(PageRecord {
            id: PageId::from_uuid(self.id),
            tenant_id: TenantId::from_uuid(self.tenant_id),
            slug: self.slug,
            meta_keywords: self.meta_keywords,
            meta_description: self.meta_description,
            status,
            translations,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PageTranslationRow {
    page_id: Uuid,
    locale: String,
    title: String,
    content: String,
}

async fn insert_translations(
    transaction: &mut Transaction<'_, Postgres>,
    page_id: PageId,
    translations: &[PageTranslationRecord],
) -> AppResult<()> {
    for translation in translations {
        sqlx::query(
            r#"
            INSERT INTO page_translations (page_id, locale, title, content)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(page_id.as_uuid())
        .bind(translation.locale.as_str())
        .bind(translation.title.as_str())
        .bind(translation.content.as_str())
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to store page translation: {error}"))
        })?;
    }

    Ok(())
}

#[async_trait]
impl PageRepository for PostgresPageRepository {
    async fn create_page(&self, record: PageRecord) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start page transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO pages (
                id, tenant_id, slug, meta_keywords, meta_description, status,
                created_by, updated_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.tenant_id.as_uuid())
        .bind(record.slug.as_str())
        .bind(record.meta_keywords.as_deref())
        .bind(record.meta_description.as_deref())
        .bind(record.status.as_str())
        .bind(record.created_by.as_str())
        .bind(record.updated_by.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_slug_conflict(error, &record.slug, "create page"))?;

        insert_translations(&mut transaction, record.id, &record.translations).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit page transaction: {error}"))
        })?;

        Ok(())
    }

    async fn find_page(
        &self,
        tenant_id: TenantId,
        page_id: PageId,
    ) -> AppResult<Option<PageRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {PAGE_COLUMNS} FROM pages AS p WHERE p.deleted_at IS NULL AND p.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        builder.push(" AND p.id = ");
        builder.push_bind(page_id.as_uuid());

        self.find_one(builder).await
    }

    async fn find_page_by_slug(
        &self,
        tenant_id: TenantId,
        slug: &str,
    ) -> AppResult<Option<PageRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {PAGE_COLUMNS} FROM pages AS p WHERE p.deleted_at IS NULL AND p.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        builder.push(" AND p.slug = ");
        builder.push_bind(slug.to_owned());

        self.find_one(builder).await
    }

    async fn list_pages(
        &self,
        tenant_id: TenantId,
        filter: PageListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PageRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {PAGE_COLUMNS} FROM pages AS p WHERE p.deleted_at IS NULL AND p.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        if let Some(status) = filter.status {
            builder.push(" AND p.status = ");
            builder.push_bind(status.as_str());
        }
        push_keyset_predicate(&mut builder, window, "p");
        push_keyset_order_and_limit(&mut builder, window, "p");

        let rows = builder
            .build_query_as::<PageRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list pages: {error}")))?;

        self.attach_translations(rows).await
    }

    async fn update_page(&self, record: PageRecord) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start page transaction: {error}"))
        })?;

        let result = sqlx::query(
            r#"
            UPDATE pages
            SET slug = $3,
                meta_keywords = $4,
                meta_description = $5,
                status = $6,
                updated_by = $7,
                updated_at = $8
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(record.tenant_id.as_uuid())
        .bind(record.id.as_uuid())
        .bind(record.slug.as_str())
        .bind(record.meta_keywords.as_deref())
        .bind(record.meta_description.as_deref())
        .bind(record.status.as_str())
        .bind(record.updated_by.as_str())
        .bind(record.updated_at)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_slug_conflict(error, &record.slug, "update page"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "page '{}' does not exist",
                record.id
            )));
        }

        sqlx::query("DELETE FROM page_translations WHERE page_id = $1")
            .bind(record.id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to replace page translations: {error}"))
            })?;
        insert_translations(&mut transaction, record.id, &record.translations).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit page transaction: {error}"))
        })?;

        Ok(())
    }

    async fn soft_delete_page(
        &self,
        tenant_id: TenantId,
        page_id: PageId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE pages
            SET deleted_at = now(), deleted_by = $3
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(page_id.as_uuid())
        .bind(deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete page: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("page '{page_id}' does not exist")));
        }

        Ok(())
    }
}

fn map_slug_conflict(error: sqlx::Error, slug: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("page slug '{slug}' is already taken"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
