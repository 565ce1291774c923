use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{PostListFilter, PostRecord, PostRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{PostId, UserId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::postgres_keyset::{push_keyset_order_and_limit, push_keyset_predicate};


const POST_COLUMNS: &str = "p.id, p.tenant_id, p.author_id, p.title, p.slug, p.description, \
     p.content, p.created_by, p.updated_by, p.created_at, p.updated_at";

/// PostgreSQL-backed post repository.
#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    tenant_id: Uuid,
    author_id: Uuid,
    title: String,
    slug: String,
    description: Option<String>,
    content: Option<String>,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            author_id: UserId::from_uuid(row.author_id),
            title: row.title,
            slug: row.slug,
            description: row.description,
            content: row.content,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, record: PostRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id, tenant_id, author_id, title, slug, description, content,
                created_by, updated_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.tenant_id.as_uuid())
        .bind(record.author_id.as_uuid())
        .bind(record.title.as_str())
        .bind(record.slug.as_str())
        .bind(record.description.as_deref())
        .bind(record.content.as_deref())
        .bind(record.created_by.as_str())
        .bind(record.updated_by.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_slug_conflict(error, &record.slug, "create post"))?;

        Ok(())
    }

    async fn find_post(
        &self,
        tenant_id: TenantId,
        post_id: PostId,
    ) -> AppResult<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts AS p \
             WHERE p.tenant_id = $1 AND p.id = $2 AND p.deleted_at IS NULL"
        ))
        .bind(tenant_id.as_uuid())
        .bind(post_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find post: {error}")))?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_posts(
        &self,
        tenant_id: TenantId,
        filter: &PostListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PostRecord>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {POST_COLUMNS} FROM posts AS p WHERE p.deleted_at IS NULL AND p.tenant_id = "
        ));
        builder.push_bind(tenant_id.as_uuid());
        if let Some(fragment) = filter.title.as_deref() {
            builder.push(" AND strpos(lower(p.title), lower(");
            builder.push_bind(fragment.to_owned());
            builder.push(")) > 0");
        }
        push_keyset_predicate(&mut builder, window, "p");
        push_keyset_order_and_limit(&mut builder, window, "p");

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list posts: {error}")))?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn count_posts_by_author(
        &self,
        tenant_id: TenantId,
        author_id: UserId,
    ) -> AppResult<usize> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM posts
            WHERE tenant_id = $1 AND author_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(author_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count posts: {error}")))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn update_post(&self, record: PostRecord) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = $3,
                slug = $4,
                description = $5,
                content = $6,
                updated_by = $7,
                updated_at = $8
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(record.tenant_id.as_uuid())
        .bind(record.id.as_uuid())
        .bind(record.title.as_str())
        .bind(record.slug.as_str())
        .bind(record.description.as_deref())
        .bind(record.content.as_deref())
        .bind(record.updated_by.as_str())
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_slug_conflict(error, &record.slug, "update post"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "post '{}' does not exist",
                record.id
            )));
        }

        Ok(())
    }

    async fn soft_delete_post(
        &self,
        tenant_id: TenantId,
        post_id: PostId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET deleted_at = now(), deleted_by = $3
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(post_id.as_uuid())
        .bind(deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete post: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("post '{post_id}' does not exist")));
        }

        Ok(())
    }
}

fn map_slug_conflict(error: sqlx::Error, slug: &str, operation: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("a post with slug '{slug}' already exists"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
