use atrium_application::pagination::CursorPage;
use atrium_application::{CreateUserInput, UpdateUserInput, UserRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::PageCursorResponse;

/// Incoming payload for end-user creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            password: value.password,
            bio: value.bio,
            image: value.image,
        }
    }
}

/// Partial end-user update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-user-request.ts"
)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            bio: value.bio,
            image: value.image,
        }
    }
}

/// Optional email filter, read from the same query string as the paging
/// parameters.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-filter-query.ts"
)]
pub struct UserFilterQuery {
    pub email: Option<String>,
}

/// API representation of an end user. The password hash never leaves the
/// service.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(value: UserRecord) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
            email: value.email,
            bio: value.bio,
            image: value.image,
            created_by: value.created_by,
            updated_by: value.updated_by,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// One page of end users.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-page-response.ts"
)]
pub struct UserPageResponse {
    pub data: Vec<UserResponse>,
    pub cursor: PageCursorResponse,
}

impl From<CursorPage<UserRecord>> for UserPageResponse {
    fn from(value: CursorPage<UserRecord>) -> Self {
        Self {
            data: value.data.into_iter().map(UserResponse::from).collect(),
            cursor: value.cursor.into(),
        }
    }
}
