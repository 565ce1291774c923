use atrium_application::BootstrapInput;
use atrium_domain::AdminIdentity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::dto::{
    AdminUserResponse, BootstrapRequest, LoginRequest, LoginResponse, RefreshRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<(StatusCode, Json<AdminUserResponse>)> {
    let admin = state
        .auth_service
        .bootstrap(BootstrapInput {
            token: payload.token,
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            username: payload.username,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AdminUserResponse::from(admin))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let result = state
        .auth_service
        .login(payload.email.as_str(), payload.password.as_str())
        .await?;

    Ok(Json(LoginResponse::from(result)))
}

pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let result = state
        .auth_service
        .refresh(payload.refresh_token.as_str())
        .await?;

    Ok(Json(LoginResponse::from(result)))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth_service
        .logout(&identity, payload.refresh_token.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
