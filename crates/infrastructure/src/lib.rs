//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_repository;
mod jwt_access_token_codec;
mod postgres_admin_user_repository;
mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_authorization_repository;
mod postgres_keyset;
mod postgres_page_repository;
mod postgres_post_repository;
mod postgres_role_repository;
mod postgres_session_repository;
mod postgres_user_repository;

#[cfg(test)]
mod postgres_test_pool;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_repository::InMemoryRepository;
pub use jwt_access_token_codec::{JWT_SECRET_MIN_LENGTH, JwtAccessTokenCodec};
pub use postgres_admin_user_repository::PostgresAdminUserRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_page_repository::PostgresPageRepository;
pub use postgres_post_repository::PostgresPostRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_session_repository::PostgresSessionRepository;
pub use postgres_user_repository::PostgresUserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
