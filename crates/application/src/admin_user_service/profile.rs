use atrium_domain::{AuditAction, validate_password};
use chrono::Utc;

use crate::AuditEvent;

use super::*;

impl AdminUserService {
    /// Changes the actor's own password after verifying the current one.
    pub async fn change_password(
        &self,
        actor: &AdminIdentity,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        let mut record = self.current_admin_user(actor).await?;

        let current_matches = self
            .password_hasher
            .verify_password(&input.current_password, &record.password_hash)?;
        if !current_matches {
            return Err(AppError::Validation(
                "current password is incorrect".to_owned(),
            ));
        }

        if input.current_password == input.new_password {
            return Err(AppError::Validation(
                "new password must differ from the current password".to_owned(),
            ));
        }

        validate_password(&input.new_password)?;

        record.password_hash = self.password_hasher.hash_password(&input.new_password)?;
        record.updated_by = actor.subject().to_owned();
        record.updated_at = Utc::now();
        self.repository.update_admin_user(record.clone()).await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::AdminUserPasswordChanged,
                resource_type: "admin_user".to_owned(),
                resource_id: record.id.to_string(),
                detail: None,
            })
            .await
    }
}
