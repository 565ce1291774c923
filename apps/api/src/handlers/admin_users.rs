use atrium_application::Ability;
use atrium_domain::{AdminIdentity, AdminUserId};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::dto::{
    AbilityResponse, AdminUserPageResponse, AdminUserResponse, ChangePasswordRequest, CreateAdminUserRequest,
    CursorPageQuery, UpdateAdminUserRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> ApiResult<Json<AdminUserResponse>> {
    let admin = state
        .admin_user_service
        .current_admin_user(&identity)
        .await?;

    Ok(Json(AdminUserResponse::from(admin)))
}

pub async fn my_permissions_handler(
    Extension(ability): Extension<Ability>,
) -> Json<AbilityResponse> {
    Json(AbilityResponse::from(&ability))
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .admin_user_service
        .change_password(&identity, payload.into())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_admin_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<CreateAdminUserRequest>,
) -> ApiResult<(StatusCode, Json<AdminUserResponse>)> {
    let admin = state
        .admin_user_service
        .create_admin_user(&identity, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(AdminUserResponse::from(admin))))
}

pub async fn list_admin_users_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Query(query): Query<CursorPageQuery>,
) -> ApiResult<Json<AdminUserPageResponse>> {
    let page = state
        .admin_user_service
        .list_admin_users(&identity, query.into_request()?)
        .await?;

    Ok(Json(AdminUserPageResponse::from(page)))
}

pub async fn get_admin_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(admin_id): Path<String>,
) -> ApiResult<Json<AdminUserResponse>> {
    let admin = state
        .admin_user_service
        .get_admin_user(&identity, admin_id.parse::<AdminUserId>()?)
        .await?;

    Ok(Json(AdminUserResponse::from(admin)))
}

pub async fn update_admin_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Extension(ability): Extension<Ability>,
    Path(admin_id): Path<String>,
    Json(payload): Json<UpdateAdminUserRequest>,
) -> ApiResult<Json<AdminUserResponse>> {
    let admin = state
        .admin_user_service
        .update_admin_user(
            &identity,
            &ability,
            admin_id.parse::<AdminUserId>()?,
            payload.into_input()?,
        )
        .await?;

    Ok(Json(AdminUserResponse::from(admin)))
}

pub async fn delete_admin_user_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(admin_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .admin_user_service
        .delete_admin_user(&identity, admin_id.parse::<AdminUserId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
