use atrium_application::pagination::CursorPage;
use atrium_application::{
    AdminUserRecord, ChangePasswordInput, CreateAdminUserInput, UpdateAdminUserInput,
};
use atrium_core::AppResult;
use atrium_domain::RoleId;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::PageCursorResponse;

/// Incoming payload for admin creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-admin-user-request.ts"
)]
pub struct CreateAdminUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role_id: String,
}

impl CreateAdminUserRequest {
    pub fn into_input(self) -> AppResult<CreateAdminUserInput> {
        Ok(CreateAdminUserInput {
            role_id: self.role_id.parse::<RoleId>()?,
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            image: self.image,
            phone: self.phone,
        })
    }
}

/// Partial admin update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-admin-user-request.ts"
)]
#[serde(default)]
pub struct UpdateAdminUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub phone: Option<String>,
    pub role_id: Option<String>,
}

impl UpdateAdminUserRequest {
    pub fn into_input(self) -> AppResult<UpdateAdminUserInput> {
        Ok(UpdateAdminUserInput {
            role_id: self
                .role_id
                .map(|value| value.parse::<RoleId>())
                .transpose()?,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            image: self.image,
            phone: self.phone,
        })
    }
}

/// Incoming payload for changing the caller's password.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/change-password-request.ts"
)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl From<ChangePasswordRequest> for ChangePasswordInput {
    fn from(value: ChangePasswordRequest) -> Self {
        Self {
            current_password: value.current_password,
            new_password: value.new_password,
        }
    }
}

/// API representation of an admin account. The password hash never leaves
/// the service layer.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/admin-user-response.ts"
)]
pub struct AdminUserResponse {
    pub id: String,
    pub tenant_id: String,
    pub username: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub phone: Option<String>,
    pub role_id: String,
    pub verified_at: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AdminUserRecord> for AdminUserResponse {
    fn from(value: AdminUserRecord) -> Self {
        Self {
            id: value.id.to_string(),
            tenant_id: value.tenant_id.to_string(),
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            full_name: value.full_name,
            bio: value.bio,
            image: value.image,
            phone: value.phone,
            role_id: value.role_id.to_string(),
            verified_at: value.verified_at.map(|instant| instant.to_rfc3339()),
            created_by: value.created_by,
            updated_by: value.updated_by,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// One page of admin accounts.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/admin-user-page-response.ts"
)]
pub struct AdminUserPageResponse {
    pub data: Vec<AdminUserResponse>,
    pub cursor: PageCursorResponse,
}

impl From<CursorPage<AdminUserRecord>> for AdminUserPageResponse {
    fn from(value: CursorPage<AdminUserRecord>) -> Self {
        Self {
            data: value.data.into_iter().map(AdminUserResponse::from).collect(),
            cursor: value.cursor.into(),
        }
    }
}
