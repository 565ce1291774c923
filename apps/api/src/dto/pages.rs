use atrium_application::pagination::CursorPage;
use atrium_application::{
    CreatePageInput, PageRecord, PageTranslationInput, PageTranslationRecord, UpdatePageInput,
};
use atrium_core::AppResult;
use atrium_domain::PageStatus;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::PageCursorResponse;

/// One localized title and body.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-translation-request.ts"
)]
pub struct PageTranslationRequest {
    pub locale: String,
    pub title: String,
    pub content: String,
}

impl From<PageTranslationRequest> for PageTranslationInput {
    fn from(value: PageTranslationRequest) -> Self {
        Self {
            locale: value.locale,
            title: value.title,
            content: value.content,
        }
    }
}

/// Incoming payload for page creation. Pages start as drafts unless a
/// status is given.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-page-request.ts"
)]
pub struct CreatePageRequest {
    pub slug: String,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub translations: Vec<PageTranslationRequest>,
}

impl CreatePageRequest {
    pub fn into_input(self) -> AppResult<CreatePageInput> {
        Ok(CreatePageInput {
            status: self
                .status
                .map(|value| value.trim().parse::<PageStatus>())
                .transpose()?
                .unwrap_or(PageStatus::Draft),
            slug: self.slug,
            meta_keywords: self.meta_keywords,
            meta_description: self.meta_description,
            translations: self
                .translations
                .into_iter()
                .map(PageTranslationInput::from)
                .collect(),
        })
    }
}

/// Partial page update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-page-request.ts"
)]
#[serde(default)]
pub struct UpdatePageRequest {
    pub slug: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
    pub translations: Option<Vec<PageTranslationRequest>>,
}

impl UpdatePageRequest {
    pub fn into_input(self) -> AppResult<UpdatePageInput> {
        Ok(UpdatePageInput {
            status: self
                .status
                .map(|value| value.trim().parse::<PageStatus>())
                .transpose()?,
            slug: self.slug,
            meta_keywords: self.meta_keywords,
            meta_description: self.meta_description,
            translations: self.translations.map(|translations| {
                translations
                    .into_iter()
                    .map(PageTranslationInput::from)
                    .collect()
            }),
        })
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-translation-response.ts"
)]
pub struct PageTranslationResponse {
    pub locale: String,
    pub title: String,
    pub content: String,
}

impl From<PageTranslationRecord> for PageTranslationResponse {
    fn from(value: PageTranslationRecord) -> Self {
        Self {
            locale: value.locale,
            title: value.title,
            content: value.content,
        }
    }
}

/// API representation of a page.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-response.ts"
)]
pub struct PageResponse {
    pub id: String,
    pub slug: String,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    pub status: String,
    pub translations: Vec<PageTranslationResponse>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PageRecord> for PageResponse {
    fn from(value: PageRecord) -> Self {
        Self {
            id: value.id.to_string(),
            slug: value.slug,
            meta_keywords: value.meta_keywords,
            meta_description: value.meta_description,
            status: value.status.as_str().to_owned(),
            translations: value
                .translations
                .into_iter()
                .map(PageTranslationResponse::from)
                .collect(),
            created_by: value.created_by,
            updated_by: value.updated_by,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// One page of CMS pages.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-page-response.ts"
)]
pub struct PagePageResponse {
    pub data: Vec<PageResponse>,
    pub cursor: PageCursorResponse,
}

impl From<CursorPage<PageRecord>> for PagePageResponse {
    fn from(value: CursorPage<PageRecord>) -> Self {
        Self {
            data: value.data.into_iter().map(PageResponse::from).collect(),
            cursor: value.cursor.into(),
        }
    }
}
