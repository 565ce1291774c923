use atrium_domain::{
    Action, AuditAction, EmailAddress, PERSON_NAME_MAX_LENGTH, Subject, Username, full_name,
    validate_password,
};
use chrono::Utc;

use crate::inputs::{optional_text, required_text};
use crate::{Ability, AuditEvent};

use super::*;

impl AdminUserService {
    /// Creates an admin account in the actor's tenant.
    pub async fn create_admin_user(
        &self,
        actor: &AdminIdentity,
        input: CreateAdminUserInput,
    ) -> AppResult<AdminUserRecord> {
        let email = EmailAddress::new(input.email)?;
        let username = input
            .username
            .filter(|value| !value.trim().is_empty())
            .map(Username::new)
            .transpose()?;
        let first_name = required_text(input.first_name, "first name", PERSON_NAME_MAX_LENGTH)?;
        let last_name = required_text(input.last_name, "last name", PERSON_NAME_MAX_LENGTH)?;
        validate_password(&input.password)?;

        self.require_role(actor, input.role_id).await?;
        self.ensure_email_available(email.as_str(), None).await?;

        let password_hash = self.password_hasher.hash_password(&input.password)?;
        let now = Utc::now();
        let record = AdminUserRecord {
            id: AdminUserId::new(),
            tenant_id: actor.tenant_id(),
            username: username.map(String::from),
            email: email.into(),
            full_name: full_name(&first_name, &last_name),
            first_name,
            last_name,
            bio: optional_text(input.bio, "bio", BIO_MAX_LENGTH)?,
            image: optional_text(input.image, "image", IMAGE_MAX_LENGTH)?,
            phone: optional_text(input.phone, "phone", PHONE_MAX_LENGTH)?,
            role_id: input.role_id,
            password_hash,
            verified_at: None,
            created_by: actor.subject().to_owned(),
            updated_by: actor.subject().to_owned(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create_admin_user(record.clone()).await?;
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::AdminUserCreated,
                resource_type: "admin_user".to_owned(),
                resource_id: record.id.to_string(),
                detail: Some(format!("created admin '{}'", record.email)),
            })
            .await?;

        Ok(record)
    }

    /// Applies a partial update to an admin account.
    ///
    /// The caller needs `update:Admin` unless it edits its own record, and
    /// role changes always need `update:Admin`.
    pub async fn update_admin_user(
        &self,
        actor: &AdminIdentity,
        ability: &Ability,
        admin_id: AdminUserId,
        input: UpdateAdminUserInput,
    ) -> AppResult<AdminUserRecord> {
        if !ability.can_on_admin(Action::Update, admin_id) {
            return Err(AppError::Forbidden("access denied".to_owned()));
        }

        let mut record = self.get_admin_user(actor, admin_id).await?;

        if let Some(role_id) = input.role_id
            && role_id != record.role_id
        {
            if ability.cannot(Action::Update, Subject::Admin) {
                return Err(AppError::Forbidden("access denied".to_owned()));
            }
            self.require_role(actor, role_id).await?;
            record.role_id = role_id;
        }

        if let Some(email) = input.email {
            let email = EmailAddress::new(email)?;
            self.ensure_email_available(email.as_str(), Some(admin_id))
                .await?;
            record.email = email.into();
        }

        if let Some(username) = input.username {
            record.username = if username.trim().is_empty() {
                None
            } else {
                Some(Username::new(username)?.into())
            };
        }

        if let Some(first_name) = input.first_name {
            record.first_name = required_text(first_name, "first name", PERSON_NAME_MAX_LENGTH)?;
        }
        if let Some(last_name) = input.last_name {
            record.last_name = required_text(last_name, "last name", PERSON_NAME_MAX_LENGTH)?;
        }
        record.full_name = full_name(&record.first_name, &record.last_name);

        if let Some(bio) = input.bio {
            record.bio = optional_text(Some(bio), "bio", BIO_MAX_LENGTH)?;
        }
        if let Some(image) = input.image {
            record.image = optional_text(Some(image), "image", IMAGE_MAX_LENGTH)?;
        }
        if let Some(phone) = input.phone {
            record.phone = optional_text(Some(phone), "phone", PHONE_MAX_LENGTH)?;
        }

        record.updated_by = actor.subject().to_owned();
        record.updated_at = Utc::now();

        self.repository.update_admin_user(record.clone()).await?;
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::AdminUserUpdated,
                resource_type: "admin_user".to_owned(),
                resource_id: admin_id.to_string(),
                detail: None,
            })
            .await?;

        Ok(record)
    }

    /// Soft-deletes an admin account other than the actor's own.
    pub async fn delete_admin_user(
        &self,
        actor: &AdminIdentity,
        admin_id: AdminUserId,
    ) -> AppResult<()> {
        if actor.admin_id() == admin_id {
            return Err(AppError::Validation(
                "admins cannot delete their own account".to_owned(),
            ));
        }

        let record = self.get_admin_user(actor, admin_id).await?;
        self.repository
            .soft_delete_admin_user(actor.tenant_id(), admin_id, actor.subject())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action: AuditAction::AdminUserDeleted,
                resource_type: "admin_user".to_owned(),
                resource_id: admin_id.to_string(),
                detail: Some(format!("deleted admin '{}'", record.email)),
            })
            .await
    }
}
