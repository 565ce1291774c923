use atrium_core::{AppResult, TenantId};
use atrium_domain::{AdminIdentity, PageId};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};

use crate::dto::{
    CreatePageRequest, CursorPageQuery, PagePageResponse, PageResponse, UpdatePageRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Header naming the tenant whose public pages are requested.
pub const TENANT_HEADER: &str = "x-tenant-id";

pub async fn create_page_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<CreatePageRequest>,
) -> ApiResult<(StatusCode, Json<PageResponse>)> {
    let page = state
        .page_service
        .create_page(&identity, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PageResponse::from(page))))
}

pub async fn list_published_pages_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CursorPageQuery>,
) -> ApiResult<Json<PagePageResponse>> {
    let tenant_id = requested_tenant(&headers, state.default_tenant_id)?;
    let page = state
        .page_service
        .list_published_pages(tenant_id, query.into_request()?)
        .await?;

    Ok(Json(PagePageResponse::from(page)))
}

pub async fn get_published_page_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> ApiResult<Json<PageResponse>> {
    let tenant_id = requested_tenant(&headers, state.default_tenant_id)?;
    let page = state
        .page_service
        .get_published_page(tenant_id, slug.as_str())
        .await?;

    Ok(Json(PageResponse::from(page)))
}

pub async fn update_page_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(page_id): Path<String>,
    Json(payload): Json<UpdatePageRequest>,
) -> ApiResult<Json<PageResponse>> {
    let page = state
        .page_service
        .update_page(&identity, page_id.parse::<PageId>()?, payload.into_input()?)
        .await?;

    Ok(Json(PageResponse::from(page)))
}

pub async fn delete_page_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(page_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .page_service
        .delete_page(&identity, page_id.parse::<PageId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn requested_tenant(
    headers: &HeaderMap,
    default_tenant_id: TenantId,
) -> AppResult<TenantId> {
    match headers
        .get(TENANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        Some(value) => value.parse::<TenantId>(),
        None => Ok(default_tenant_id),
    }
}
