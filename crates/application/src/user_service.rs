//! End-user account administration.

use std::sync::Arc;

use atrium_core::{AppError, AppResult};
use atrium_domain::{
    AdminIdentity, AuditAction, EmailAddress, UserId, Username, validate_password,
};
use chrono::Utc;

use crate::inputs::optional_text;
use crate::pagination::{CursorPage, CursorPageRequest, PaginationSettings};
use crate::{
    AuditEvent, AuditRepository, BIO_MAX_LENGTH, IMAGE_MAX_LENGTH, PasswordHasher, PostRepository,
    USER_PAGINATION_KEYS, UserListFilter, UserRecord, UserRepository,
};


/// Input for creating an end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Initial plaintext password.
    pub password: String,
    /// Optional biography.
    pub bio: Option<String>,
    /// Optional avatar URL.
    pub image: Option<String>,
}

/// Partial update of an end user. `None` keeps the current value and an
/// empty string clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// New username.
    pub username: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New biography.
    pub bio: Option<String>,
    /// New avatar URL.
    pub image: Option<String>,
}

/// Application service for end-user accounts.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    post_repository: Arc<dyn PostRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
    pagination: PaginationSettings,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn UserRepository>,
        post_repository: Arc<dyn PostRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit_repository: Arc<dyn AuditRepository>,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            repository,
            post_repository,
            password_hasher,
            audit_repository,
            pagination,
        }
    }

    /// Creates a user in the actor's tenant.
    pub async fn create_user(
        &self,
        actor: &AdminIdentity,
        input: CreateUserInput,
    ) -> AppResult<UserRecord> {
        let username = Username::new(input.username)?;
        let email = EmailAddress::new(input.email)?;
        validate_password(&input.password)?;
        let bio = optional_text(input.bio, "bio", BIO_MAX_LENGTH)?;
        let image = optional_text(input.image, "image", IMAGE_MAX_LENGTH)?;

        let now = Utc::now();
        let record = UserRecord {
            id: UserId::new(),
            tenant_id: actor.tenant_id(),
            username: username.into(),
            email: email.into(),
            bio,
            image,
            password_hash: self.password_hasher.hash_password(&input.password)?,
            created_by: actor.subject().to_owned(),
            updated_by: actor.subject().to_owned(),
            created_at: now,
            updated_at: now,
        };

        self.repository.create_user(record.clone()).await?;
        self.append_user_event(actor, AuditAction::UserCreated, &record)
            .await?;

        Ok(record)
    }

    /// Returns one user of the actor's tenant.
    pub async fn get_user(&self, actor: &AdminIdentity, user_id: UserId) -> AppResult<UserRecord> {
        self.repository
            .find_user(actor.tenant_id(), user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    /// Lists one page of the actor's tenant users, optionally narrowed by an
    /// email fragment.
    pub async fn list_users(
        &self,
        actor: &AdminIdentity,
        email: Option<String>,
        request: CursorPageRequest,
    ) -> AppResult<CursorPage<UserRecord>> {
        let paginator = self
            .pagination
            .paginator(USER_PAGINATION_KEYS.to_vec(), request)?;
        let tenant_id = actor.tenant_id();
        let filter = UserListFilter {
            email: email
                .map(|value| value.trim().to_lowercase())
                .filter(|value| !value.is_empty()),
        };
        let filter = &filter;

        paginator
            .paginate(|window| async move {
                self.repository.list_users(tenant_id, filter, &window).await
            })
            .await
    }

    /// Applies a partial update to a user.
    pub async fn update_user(
        &self,
        actor: &AdminIdentity,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<UserRecord> {
        let mut record = self.get_user(actor, user_id).await?;

        if let Some(username) = input.username {
            record.username = Username::new(username)?.into();
        }
        if let Some(email) = input.email {
            record.email = EmailAddress::new(email)?.into();
        }
        if let Some(bio) = input.bio {
            record.bio = optional_text(Some(bio), "bio", BIO_MAX_LENGTH)?;
        }
        if let Some(image) = input.image {
            record.image = optional_text(Some(image), "image", IMAGE_MAX_LENGTH)?;
        }

        record.updated_by = actor.subject().to_owned();
        record.updated_at = Utc::now();

        self.repository.update_user(record.clone()).await?;
        self.append_user_event(actor, AuditAction::UserUpdated, &record)
            .await?;

        Ok(record)
    }

    /// Soft-deletes a user that authored no live post.
    pub async fn delete_user(&self, actor: &AdminIdentity, user_id: UserId) -> AppResult<()> {
        let record = self.get_user(actor, user_id).await?;

        let posts = self
            .post_repository
            .count_posts_by_author(actor.tenant_id(), user_id)
            .await?;
        if posts > 0 {
            return Err(AppError::Conflict(format!(
                "user '{}' still authors {posts} post(s)",
                record.username
            )));
        }

        self.repository
            .soft_delete_user(actor.tenant_id(), user_id, actor.subject())
            .await?;
        self.append_user_event(actor, AuditAction::UserDeleted, &record)
            .await
    }

    async fn append_user_event(
        &self,
        actor: &AdminIdentity,
        action: AuditAction,
        record: &UserRecord,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action,
                resource_type: "user".to_owned(),
                resource_id: record.id.to_string(),
                detail: Some(format!("username={} email={}", record.username, record.email)),
            })
            .await
    }
}
