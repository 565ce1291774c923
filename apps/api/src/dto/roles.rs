use atrium_application::pagination::CursorPage;
use atrium_application::{Ability, CreateRoleInput, RoleRecord, UpdateRoleInput};
use atrium_domain::Grant;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::PageCursorResponse;

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(value: CreateRoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            permissions: value.permissions,
        }
    }
}

/// Partial role update; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-role-request.ts"
)]
#[serde(default)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

impl From<UpdateRoleRequest> for UpdateRoleInput {
    fn from(value: UpdateRoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            permissions: value.permissions,
        }
    }
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RoleRecord> for RoleResponse {
    fn from(value: RoleRecord) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            permissions: value.grants.iter().map(ToString::to_string).collect(),
            created_by: value.created_by,
            updated_by: value.updated_by,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// One page of roles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-page-response.ts"
)]
pub struct RolePageResponse {
    pub data: Vec<RoleResponse>,
    pub cursor: PageCursorResponse,
}

impl From<CursorPage<RoleRecord>> for RolePageResponse {
    fn from(value: CursorPage<RoleRecord>) -> Self {
        Self {
            data: value.data.into_iter().map(RoleResponse::from).collect(),
            cursor: value.cursor.into(),
        }
    }
}

/// Entry of the grant catalogue offered to role editors.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-response.ts"
)]
pub struct GrantResponse {
    pub permission: String,
    pub action: String,
    pub subject: String,
}

impl From<Grant> for GrantResponse {
    fn from(value: Grant) -> Self {
        Self {
            permission: value.to_string(),
            action: value.action().as_str().to_owned(),
            subject: value.subject().as_str().to_owned(),
        }
    }
}

/// Effective grants of the calling admin after wildcard expansion.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/ability-response.ts"
)]
pub struct AbilityResponse {
    pub admin_id: String,
    pub full_access: bool,
    pub grants: Vec<GrantResponse>,
}

impl From<&Ability> for AbilityResponse {
    fn from(value: &Ability) -> Self {
        Self {
            admin_id: value.principal().to_string(),
            full_access: value.has_full_access(),
            grants: value.grants().map(GrantResponse::from).collect(),
        }
    }
}
