use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{UserListFilter, UserRecord, UserRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::UserId;

use super::InMemoryRepository;

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn create_user(&self, record: UserRecord) -> AppResult<()> {
        let mut users = self.users.write().await;
        ensure_user_available(users.values(), &record)?;
        users.insert(record.id, record);
        Ok(())
    }

    async fn find_user(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .get(&user_id)
            .filter(|user| user.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_users(
        &self,
        tenant_id: TenantId,
        filter: &UserListFilter,
        window: &KeysetWindow,
    ) -> AppResult<Vec<UserRecord>> {
        let users = self.users.read().await;
        window.apply(
            users
                .values()
                .filter(|user| user.tenant_id == tenant_id && filter.matches(user))
                .cloned(),
        )
    }

    async fn update_user(&self, record: UserRecord) -> AppResult<()> {
        let mut users = self.users.write().await;
        if !users
            .get(&record.id)
            .is_some_and(|existing| existing.tenant_id == record.tenant_id)
        {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                record.id
            )));
        }

        ensure_user_available(users.values().filter(|user| user.id != record.id), &record)?;
        users.insert(record.id, record);
        Ok(())
    }

    async fn soft_delete_user(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let mut users = self.users.write().await;
        if !users
            .get(&user_id)
            .is_some_and(|user| user.tenant_id == tenant_id)
        {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        users.remove(&user_id);
        tracing::debug!(user_id = %user_id, deleted_by, "user removed from memory");
        Ok(())
    }
}

fn ensure_user_available<'a>(
    mut others: impl Iterator<Item = &'a UserRecord>,
    record: &UserRecord,
) -> AppResult<()> {
    let taken = others.any(|user| {
        user.tenant_id == record.tenant_id
            && (user.username == record.username || user.email == record.email)
    });
    if taken {
        return Err(AppError::Conflict(format!(
            "username '{}' or email '{}' is already taken",
            record.username, record.email
        )));
    }

    Ok(())
}
