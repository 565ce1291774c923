//! Application services and ports.

#![forbid(unsafe_code)]

mod admin_user_ports;
mod admin_user_service;
mod audit_log_service;
mod audit_ports;
mod auth_service;
mod authorization_service;
mod inputs;
mod page_ports;
mod page_service;
pub mod pagination;
mod post_ports;
mod post_service;
mod role_ports;
mod role_service;
mod session_ports;
mod user_ports;
mod user_service;

#[cfg(test)]
mod test_support;

pub use admin_user_ports::{
    ADMIN_USER_PAGINATION_KEYS, AdminUserRecord, AdminUserRepository, PasswordHasher,
};
pub use admin_user_service::{
    AdminUserService, BIO_MAX_LENGTH, ChangePasswordInput, CreateAdminUserInput,
    IMAGE_MAX_LENGTH, PHONE_MAX_LENGTH, UpdateAdminUserInput,
};
pub use audit_log_service::AuditLogService;
pub use audit_ports::{
    AUDIT_LOG_PAGINATION_KEYS, AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository,
    AuditRepository,
};
pub use auth_service::{
    AccessTokenCodec, AuthService, AuthSettings, BootstrapInput, BootstrapSettings,
    IssuedAccessToken, LoginResult, SUPER_ADMIN_ROLE_NAME,
};
pub use authorization_service::{
    Ability, AuthorizationRepository, AuthorizationService, GateDecision, PolicyGate,
    PolicyPredicate, PrincipalGrants, RouteAccess, requires, resolve_grants,
};
pub use page_ports::{
    PAGE_PAGINATION_KEYS, PageListFilter, PageRecord, PageRepository, PageTranslationRecord,
};
pub use page_service::{
    CreatePageInput, PAGE_CONTENT_MAX_LENGTH, PAGE_TITLE_MAX_LENGTH, PageService,
    PageTranslationInput, UpdatePageInput,
};
pub use post_ports::{POST_PAGINATION_KEYS, PostListFilter, PostRecord, PostRepository};
pub use post_service::{
    CreatePostInput, POST_CONTENT_MAX_LENGTH, POST_DESCRIPTION_MAX_LENGTH, POST_TITLE_MAX_LENGTH,
    PostService, UpdatePostInput,
};
pub use role_ports::{ROLE_PAGINATION_KEYS, RoleRecord, RoleRepository};
pub use role_service::{
    CreateRoleInput, ROLE_DESCRIPTION_MAX_LENGTH, ROLE_NAME_MAX_LENGTH, RoleService,
    UpdateRoleInput,
};
pub use session_ports::{SessionRecord, SessionRepository};
pub use user_ports::{USER_PAGINATION_KEYS, UserListFilter, UserRecord, UserRepository};
pub use user_service::{CreateUserInput, UpdateUserInput, UserService};
