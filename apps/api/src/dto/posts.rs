use atrium_application::pagination::CursorPage;
use atrium_application::{CreatePostInput, PostRecord, UpdatePostInput};
use atrium_core::AppResult;
use atrium_domain::UserId;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::PageCursorResponse;

/// Incoming payload for post creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-post-request.ts"
)]
pub struct CreatePostRequest {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CreatePostRequest {
    pub fn into_input(self) -> AppResult<CreatePostInput> {
        Ok(CreatePostInput {
            author_id: self.user_id.trim().parse::<UserId>()?,
            title: self.title,
            slug: self.slug,
            description: self.description,
            content: self.content,
        })
    }
}

/// Partial post update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-post-request.ts"
)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl From<UpdatePostRequest> for UpdatePostInput {
    fn from(value: UpdatePostRequest) -> Self {
        Self {
            title: value.title,
            slug: value.slug,
            description: value.description,
            content: value.content,
        }
    }
}

/// Optional title filter of the public post listing.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/post-filter-query.ts"
)]
pub struct PostFilterQuery {
    pub title: Option<String>,
}

/// API representation of a post.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/post-response.ts"
)]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostRecord> for PostResponse {
    fn from(value: PostRecord) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.author_id.to_string(),
            title: value.title,
            slug: value.slug,
            description: value.description,
            content: value.content,
            created_by: value.created_by,
            updated_by: value.updated_by,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// One page of posts.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/post-page-response.ts"
)]
pub struct PostPageResponse {
    pub data: Vec<PostResponse>,
    pub cursor: PageCursorResponse,
}

impl From<CursorPage<PostRecord>> for PostPageResponse {
    fn from(value: CursorPage<PostRecord>) -> Self {
        Self {
            data: value.data.into_iter().map(PostResponse::from).collect(),
            cursor: value.cursor.into(),
        }
    }
}
