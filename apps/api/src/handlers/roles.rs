use atrium_domain::{AdminIdentity, RoleId};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::dto::{
    CreateRoleRequest, CursorPageQuery, GrantResponse, RolePageResponse, RoleResponse,
    UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .role_service
        .create_role(&identity, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Query(query): Query<CursorPageQuery>,
) -> ApiResult<Json<RolePageResponse>> {
    let page = state
        .role_service
        .list_roles(&identity, query.into_request()?)
        .await?;

    Ok(Json(RolePageResponse::from(page)))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .get_role(&identity, role_id.parse::<RoleId>()?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .update_role(&identity, role_id.parse::<RoleId>()?, payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .delete_role(&identity, role_id.parse::<RoleId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn permission_catalogue_handler(
    State(state): State<AppState>,
) -> Json<Vec<GrantResponse>> {
    Json(
        state
            .role_service
            .permission_catalogue()
            .into_iter()
            .map(GrantResponse::from)
            .collect(),
    )
}
