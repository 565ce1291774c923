use async_trait::async_trait;
use atrium_core::{AppResult, TenantId};
use atrium_domain::{PostId, UserId};
use chrono::{DateTime, Utc};

use crate::pagination::{CursorKeyed, CursorKind, CursorValue, KeysetWindow, PaginationKey};

/// Post as stored by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// Unique post identifier.
    pub id: PostId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Authoring end user.
    pub author_id: UserId,
    /// Title.
    pub title: String,
    /// Slug, unique among live posts of the tenant.
    pub slug: String,
    /// Optional summary.
    pub description: Option<String>,
    /// Optional body.
    pub content: Option<String>,
    /// Subject that created the post.
    pub created_by: String,
    /// Subject that last changed the post.
    pub updated_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last change timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Ordering keys of post listings.
pub const POST_PAGINATION_KEYS: [PaginationKey; 2] = [
    PaginationKey::required("created_at", CursorKind::Timestamp),
    PaginationKey::required("id", CursorKind::Uuid),
];

impl CursorKeyed for PostRecord {
    fn cursor_value(&self, column: &str) -> Option<CursorValue> {
        match column {
            "created_at" => Some(CursorValue::Timestamp(self.created_at)),
            "id" => Some(CursorValue::Uuid(self.id.as_uuid())),
            _ => None,
        }
    }
}

/// Filters for post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListFilter {
    /// Case-insensitive fragment the title must contain.
    pub title: Option<String>,
}

impl PostListFilter {
    /// Evaluates the filter against a record held in memory.
    #[must_use]
    pub fn matches(&self, record: &PostRecord) -> bool {
        self.title.as_deref().is_none_or(|fragment| {
            record
                .title
                .to_lowercase()
                .contains(&fragment.to_lowercase())
        })
    }
}

/// Repository port for posts. Soft-deleted rows are invisible.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts a post. Fails with `Conflict` on a taken slug.
    async fn create_post(&self, record: PostRecord) -> AppResult<()>;

    /// Finds a live post in a tenant.
    async fn find_post(&self, tenant_id: TenantId, post_id: PostId)
    -> AppResult<Option<PostRecord>>;

    /// Lists live posts of a tenant inside the keyset window.
    async fn list_posts(
        &self,
        tenant_id: TenantId,
        filter: &PostListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<PostRecord>>;

    /// Counts live posts written by a user.
    async fn count_posts_by_author(
        &self,
        tenant_id: TenantId,
        author_id: UserId,
    ) -> AppResult<usize>;

    /// Persists the mutable columns of an existing post.
    async fn update_post(&self, record: PostRecord) -> AppResult<()>;

    /// Soft-deletes a post.
    async fn soft_delete_post(
        &self,
        tenant_id: TenantId,
        post_id: PostId,
        deleted_by: &str,
    ) -> AppResult<()>;
}
