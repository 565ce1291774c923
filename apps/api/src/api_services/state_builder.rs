use std::sync::Arc;

use atrium_application::pagination::PaginationSettings;
use atrium_application::{
    AdminUserService, AuditLogService, AuthService, AuthSettings, AuthorizationService,
    BootstrapSettings, PageService, PasswordHasher, PolicyGate, PostService, RoleService,
    UserService,
};
use atrium_core::AppError;
use atrium_infrastructure::JwtAccessTokenCodec;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod repositories;

pub use repositories::RepositorySet;

pub fn build_app_state(
    config: &ApiConfig,
    repositories: RepositorySet,
    password_hasher: Arc<dyn PasswordHasher>,
) -> Result<AppState, AppError> {
    let pagination = PaginationSettings {
        max_limit: config.pagination_max_limit,
    };
    let token_codec = Arc::new(JwtAccessTokenCodec::new(
        &config.jwt_secret,
        config.jwt_expires_in,
    )?);

    let auth_service = AuthService::new(
        repositories.admin_user_repository.clone(),
        repositories.role_repository.clone(),
        repositories.session_repository,
        password_hasher.clone(),
        token_codec,
        repositories.audit_repository.clone(),
        AuthSettings {
            bootstrap: BootstrapSettings {
                token: config.bootstrap_token.clone(),
                tenant_id: config.default_tenant_id,
            },
            refresh_token_ttl: config.refresh_token_expires_in,
        },
    );

    Ok(AppState {
        auth_service,
        admin_user_service: AdminUserService::new(
            repositories.admin_user_repository.clone(),
            repositories.role_repository.clone(),
            password_hasher.clone(),
            repositories.audit_repository.clone(),
            pagination,
        ),
        user_service: UserService::new(
            repositories.user_repository.clone(),
            repositories.post_repository.clone(),
            password_hasher,
            repositories.audit_repository.clone(),
            pagination,
        ),
        post_service: PostService::new(
            repositories.post_repository,
            repositories.user_repository,
            repositories.audit_repository.clone(),
            pagination,
        ),
        role_service: RoleService::new(
            repositories.role_repository,
            repositories.admin_user_repository,
            repositories.audit_repository.clone(),
            pagination,
        ),
        page_service: PageService::new(
            repositories.page_repository,
            repositories.audit_repository,
            pagination,
        ),
        audit_log_service: AuditLogService::new(repositories.audit_log_repository, pagination),
        policy_gate: PolicyGate::new(AuthorizationService::new(
            repositories.authorization_repository,
        )),
        default_tenant_id: config.default_tenant_id,
    })
}
