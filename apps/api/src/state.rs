use atrium_application::{
    AdminUserService, AuditLogService, AuthService, PageService, PolicyGate, PostService,
    RoleService, UserService,
};
use atrium_core::TenantId;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub admin_user_service: AdminUserService,
    pub role_service: RoleService,
    pub page_service: PageService,
    pub user_service: UserService,
    pub post_service: PostService,
    pub audit_log_service: AuditLogService,
    pub policy_gate: PolicyGate,
    /// Tenant served by public routes that name no tenant.
    pub default_tenant_id: TenantId,
}
