use async_trait::async_trait;
use atrium_core::{AppResult, TenantId};
use atrium_domain::{AdminUserId, SessionId};
use chrono::{DateTime, Utc};

/// Refresh session of one admin login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session identifier embedded in the refresh token.
    pub id: SessionId,
    /// Tenant of the admin.
    pub tenant_id: TenantId,
    /// Admin the session belongs to.
    pub admin_id: AdminUserId,
    /// SHA-256 hex digest of the current refresh secret.
    pub secret_hash: String,
    /// Instant after which the session can no longer be refreshed.
    pub expires_at: DateTime<Utc>,
    /// Login timestamp.
    pub created_at: DateTime<Utc>,
    /// Last rotation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Repository port for refresh sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a new session.
    async fn create_session(&self, record: SessionRecord) -> AppResult<()>;

    /// Finds a session by id.
    async fn find_session(&self, session_id: SessionId) -> AppResult<Option<SessionRecord>>;

    /// Replaces the secret hash when it still equals `expected_hash`.
    ///
    /// Returns `false` when another refresh rotated the session first.
    async fn rotate_session(
        &self,
        session_id: SessionId,
        expected_hash: &str,
        secret_hash: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Deletes a session; unknown ids are ignored.
    async fn delete_session(&self, session_id: SessionId) -> AppResult<()>;
}
