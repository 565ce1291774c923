use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{AdminUserRecord, AdminUserRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{AdminUserId, RoleId};

use super::InMemoryRepository;

#[async_trait]
impl AdminUserRepository for InMemoryRepository {
    async fn create_admin_user(&self, record: AdminUserRecord) -> AppResult<()> {
        let mut admins = self.admins.write().await;
        ensure_identity_available(admins.values(), &record)?;
        admins.insert(record.id, record);
        Ok(())
    }

    async fn find_admin_user(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
    ) -> AppResult<Option<AdminUserRecord>> {
        Ok(self
            .admins
            .read()
            .await
            .get(&admin_id)
            .filter(|admin| admin.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_admin_user_by_email(&self, email: &str) -> AppResult<Option<AdminUserRecord>> {
        Ok(self
            .admins
            .read()
            .await
            .values()
            .find(|admin| admin.email == email)
            .cloned())
    }

    async fn find_admin_user_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<AdminUserRecord>> {
        Ok(self
            .admins
            .read()
            .await
            .values()
            .find(|admin| admin.username.as_deref() == Some(username))
            .cloned())
    }

    async fn list_admin_users(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<AdminUserRecord>> {
        let admins = self.admins.read().await;
        window.apply(
            admins
                .values()
                .filter(|admin| admin.tenant_id == tenant_id)
                .cloned(),
        )
    }

    async fn update_admin_user(&self, record: AdminUserRecord) -> AppResult<()> {
        let mut admins = self.admins.write().await;
        if !admins
            .get(&record.id)
            .is_some_and(|existing| existing.tenant_id == record.tenant_id)
        {
            return Err(AppError::NotFound(format!(
                "admin user '{}' does not exist",
                record.id
            )));
        }

        ensure_identity_available(
            admins.values().filter(|admin| admin.id != record.id),
            &record,
        )?;
        admins.insert(record.id, record);
        Ok(())
    }

    async fn soft_delete_admin_user(
        &self,
        tenant_id: TenantId,
        admin_id: AdminUserId,
        deleted_by: &str,
    ) -> AppResult<()> {
        let mut admins = self.admins.write().await;
        if !admins
            .get(&admin_id)
            .is_some_and(|admin| admin.tenant_id == tenant_id)
        {
            return Err(AppError::NotFound(format!(
                "admin user '{admin_id}' does not exist"
            )));
        }

        admins.remove(&admin_id);
        tracing::debug!(admin_id = %admin_id, deleted_by, "admin user removed from memory");
        Ok(())
    }

    async fn count_admin_users(&self, tenant_id: TenantId) -> AppResult<usize> {
        Ok(self
            .admins
            .read()
            .await
            .values()
            .filter(|admin| admin.tenant_id == tenant_id)
            .count())
    }

    async fn count_admin_users_with_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<usize> {
        Ok(self
            .admins
            .read()
            .await
            .values()
            .filter(|admin| admin.tenant_id == tenant_id && admin.role_id == role_id)
            .count())
    }
}

fn ensure_identity_available<'a>(
    mut others: impl Iterator<Item = &'a AdminUserRecord>,
    record: &AdminUserRecord,
) -> AppResult<()> {
    let taken = others.any(|admin| {
        admin.email == record.email
            || (record.username.is_some() && admin.username == record.username)
    });

    if taken {
        return Err(AppError::Conflict(
            "an admin with this email or username already exists".to_owned(),
        ));
    }

    Ok(())
}
