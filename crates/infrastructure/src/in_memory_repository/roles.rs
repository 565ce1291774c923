use async_trait::async_trait;
use atrium_application::pagination::KeysetWindow;
use atrium_application::{RoleRecord, RoleRepository};
use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::RoleId;

use super::InMemoryRepository;

#[async_trait]
impl RoleRepository for InMemoryRepository {
    async fn create_role(&self, record: RoleRecord) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        ensure_name_available(roles.values(), &record)?;
        roles.insert(record.id, record);
        Ok(())
    }

    async fn find_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Option<RoleRecord>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&role_id)
            .filter(|role| role.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_role_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> AppResult<Option<RoleRecord>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role.tenant_id == tenant_id && role.name == name)
            .cloned())
    }

    async fn list_roles(
        &self,
        tenant_id: TenantId,
        window: &KeysetWindow,
    ) -> AppResult<Vec<RoleRecord>> {
        let roles = self.roles.read().await;
        window.apply(
            roles
                .values()
                .filter(|role| role.tenant_id == tenant_id)
                .cloned(),
        )
    }

    async fn update_role(&self, record: RoleRecord) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        if !roles
            .get(&record.id)
            .is_some_and(|existing| existing.tenant_id == record.tenant_id)
        {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                record.id
            )));
        }

        ensure_name_available(roles.values().filter(|role| role.id != record.id), &record)?;
        roles.insert(record.id, record);
        Ok(())
    }

    async fn soft_delete_role(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        _deleted_by: &str,
    ) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        match roles.get(&role_id) {
            Some(role) if role.tenant_id == tenant_id => {
                roles.remove(&role_id);
                Ok(())
            }
            _ => Err(AppError::NotFound(format!("role '{role_id}' does not exist"))),
        }
    }
}

fn ensure_name_available<'a>(
    mut others: impl Iterator<Item = &'a RoleRecord>,
    record: &RoleRecord,
) -> AppResult<()> {
    if others.any(|role| role.tenant_id == record.tenant_id && role.name == record.name) {
        return Err(AppError::Conflict(format!(
            "role '{}' already exists",
            record.name
        )));
    }

    Ok(())
}
