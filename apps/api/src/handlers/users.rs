use atrium_domain::{AdminIdentity, UserId};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::dto::{
    CreateUserRequest, CursorPageQuery, UpdateUserRequest, UserFilterQuery, UserPageResponse,
    UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(&identity, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Query(filter): Query<UserFilterQuery>,
    Query(query): Query<CursorPageQuery>,
) -> ApiResult<Json<UserPageResponse>> {
    let page = state
        .user_service
        .list_users(&identity, filter.email, query.into_request()?)
        .await?;

    Ok(Json(UserPageResponse::from(page)))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .get_user(&identity, user_id.parse::<UserId>()?)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(&identity, user_id.parse::<UserId>()?, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete_user(&identity, user_id.parse::<UserId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
