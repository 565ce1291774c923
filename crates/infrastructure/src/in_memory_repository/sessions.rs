use async_trait::async_trait;
use atrium_application::{SessionRecord, SessionRepository};
use atrium_core::AppResult;
use atrium_domain::SessionId;
use chrono::{DateTime, Utc};

use super::InMemoryRepository;

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn create_session(&self, record: SessionRecord) -> AppResult<()> {
        self.sessions.write().await.insert(record.id, record);
        Ok(())
    }

    async fn find_session(&self, session_id: SessionId) -> AppResult<Option<SessionRecord>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn rotate_session(
        &self,
        session_id: SessionId,
        expected_hash: &str,
        secret_hash: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions
            .get_mut(&session_id)
            .filter(|session| session.secret_hash == expected_hash)
        else {
            return Ok(false);
        };

        session.secret_hash = secret_hash;
        session.expires_at = expires_at;
        session.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_session(&self, session_id: SessionId) -> AppResult<()> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }
}
