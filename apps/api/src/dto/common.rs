use atrium_application::pagination::{CursorPageRequest, PageCursor};
use atrium_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Paging parameters accepted by every listing endpoint.
///
/// Values stay raw strings so malformed input surfaces as a validation
/// error in the standard error body.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/cursor-page-query.ts"
)]
pub struct CursorPageQuery {
    pub limit: Option<String>,
    pub order: Option<String>,
    pub after_cursor: Option<String>,
    pub before_cursor: Option<String>,
}

impl CursorPageQuery {
    pub fn into_request(self) -> AppResult<CursorPageRequest> {
        let mut request = CursorPageRequest::default();

        if let Some(limit) = non_blank(self.limit) {
            request.limit = limit.parse::<usize>().map_err(|_| {
                AppError::Validation(format!("limit must be a positive integer, got '{limit}'"))
            })?;
        }
        if let Some(order) = non_blank(self.order) {
            request.order = order.parse()?;
        }
        request.after_cursor = self.after_cursor;
        request.before_cursor = self.before_cursor;

        Ok(request)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Continuation tokens of a listing page.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/page-cursor-response.ts"
)]
pub struct PageCursorResponse {
    pub after_cursor: Option<String>,
    pub before_cursor: Option<String>,
}

impl From<PageCursor> for PageCursorResponse {
    fn from(value: PageCursor) -> Self {
        Self {
            after_cursor: value.after_cursor,
            before_cursor: value.before_cursor,
        }
    }
}
