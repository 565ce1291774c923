use atrium_application::LoginResult;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for creating the first admin.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub token: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Incoming payload for password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh token presented to rotate a session or end it.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/refresh-request.ts"
)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Issued bearer token and refresh token.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub user_id: String,
    pub access_token: String,
    pub token_expires: String,
    pub refresh_token: String,
    pub refresh_token_expires: String,
}

impl From<LoginResult> for LoginResponse {
    fn from(value: LoginResult) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            access_token: value.access_token,
            token_expires: value.token_expires.to_rfc3339(),
            refresh_token: value.refresh_token,
            refresh_token_expires: value.refresh_token_expires.to_rfc3339(),
        }
    }
}
