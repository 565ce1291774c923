use atrium_domain::{AdminIdentity, PostId};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};

use crate::dto::{
    CreatePostRequest, CursorPageQuery, PostFilterQuery, PostPageResponse, PostResponse,
    UpdatePostRequest,
};
use crate::error::ApiResult;
use crate::handlers::pages::requested_tenant;
use crate::state::AppState;

pub async fn list_posts_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(filter): Query<PostFilterQuery>,
    Query(query): Query<CursorPageQuery>,
) -> ApiResult<Json<PostPageResponse>> {
    let tenant_id = requested_tenant(&headers, state.default_tenant_id)?;
    let page = state
        .post_service
        .list_posts(tenant_id, filter.title, query.into_request()?)
        .await?;

    Ok(Json(PostPageResponse::from(page)))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = state
        .post_service
        .create_post(&identity, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let post = state
        .post_service
        .get_post(&identity, post_id.parse::<PostId>()?)
        .await?;

    Ok(Json(PostResponse::from(post)))
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post = state
        .post_service
        .update_post(&identity, post_id.parse::<PostId>()?, payload.into())
        .await?;

    Ok(Json(PostResponse::from(post)))
}

pub async fn delete_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .post_service
        .delete_post(&identity, post_id.parse::<PostId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
