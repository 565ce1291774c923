use std::sync::Arc;

use atrium_application::{
    AdminUserRepository, AuditLogRepository, AuditRepository, AuthorizationRepository,
    PageRepository, PostRepository, RoleRepository, SessionRepository, UserRepository,
};
use atrium_infrastructure::{
    InMemoryRepository, PostgresAdminUserRepository, PostgresAuditLogRepository,
    PostgresAuditRepository, PostgresAuthorizationRepository, PostgresPageRepository,
    PostgresPostRepository, PostgresRoleRepository, PostgresSessionRepository,
    PostgresUserRepository,
};
use sqlx::PgPool;

/// Port implementations shared by the services of one process.
pub struct RepositorySet {
    pub admin_user_repository: Arc<dyn AdminUserRepository>,
    pub role_repository: Arc<dyn RoleRepository>,
    pub page_repository: Arc<dyn PageRepository>,
    pub audit_repository: Arc<dyn AuditRepository>,
    pub audit_log_repository: Arc<dyn AuditLogRepository>,
    pub authorization_repository: Arc<dyn AuthorizationRepository>,
    pub session_repository: Arc<dyn SessionRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub post_repository: Arc<dyn PostRepository>,
}

impl RepositorySet {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            admin_user_repository: Arc::new(PostgresAdminUserRepository::new(pool.clone())),
            role_repository: Arc::new(PostgresRoleRepository::new(pool.clone())),
            page_repository: Arc::new(PostgresPageRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
            audit_log_repository: Arc::new(PostgresAuditLogRepository::new(pool.clone())),
            authorization_repository: Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
            session_repository: Arc::new(PostgresSessionRepository::new(pool.clone())),
            user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            post_repository: Arc::new(PostgresPostRepository::new(pool.clone())),
        }
    }

    /// Backs every port with one shared in-memory store.
    pub fn in_memory(store: Arc<InMemoryRepository>) -> Self {
        Self {
            admin_user_repository: store.clone(),
            role_repository: store.clone(),
            page_repository: store.clone(),
            audit_repository: store.clone(),
            audit_log_repository: store.clone(),
            authorization_repository: store.clone(),
            session_repository: store.clone(),
            user_repository: store.clone(),
            post_repository: store,
        }
    }
}
