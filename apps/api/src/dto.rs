//! Request and response payloads of the HTTP API.

mod admin_users;
mod audit_log;
mod auth;
mod common;
mod pages;
mod posts;
mod roles;
mod users;

pub use admin_users::{
    AdminUserPageResponse, AdminUserResponse, ChangePasswordRequest, CreateAdminUserRequest,
    UpdateAdminUserRequest,
};
pub use audit_log::{AuditLogEntryResponse, AuditLogFilterQuery, AuditLogPageResponse};
pub use auth::{BootstrapRequest, LoginRequest, LoginResponse, RefreshRequest};
pub use common::{CursorPageQuery, HealthResponse, PageCursorResponse};
pub use pages::{CreatePageRequest, PagePageResponse, PageResponse, UpdatePageRequest};
pub use posts::{
    CreatePostRequest, PostFilterQuery, PostPageResponse, PostResponse, UpdatePostRequest,
};
pub use roles::{
    AbilityResponse, CreateRoleRequest, GrantResponse, RolePageResponse, RoleResponse,
    UpdateRoleRequest,
};
pub use users::{
    CreateUserRequest, UpdateUserRequest, UserFilterQuery, UserPageResponse, UserResponse,
};
