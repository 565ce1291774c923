//! Password login, refresh sessions, first-admin bootstrap and access token
//! verification.

use std::sync::Arc;

use atrium_core::{AppError, AppResult, TenantId};
use atrium_domain::{
    AdminIdentity, AdminUserId, AuditAction, EmailAddress, Grant, PERSON_NAME_MAX_LENGTH, RoleId,
    SessionId, Username, full_name, validate_password,
};
use chrono::{DateTime, Duration, Utc};

use crate::inputs::required_text;
use crate::{
    AdminUserRecord, AdminUserRepository, AuditEvent, AuditRepository, PasswordHasher, RoleRecord,
    RoleRepository, SessionRecord, SessionRepository,
};

mod session_secret;

#[cfg(test)]
mod tests;

use session_secret::{generate_secret, hash_secret};

/// Name of the role created by bootstrap.
pub const SUPER_ADMIN_ROLE_NAME: &str = "Super Admin";

const BOOTSTRAP_SUBJECT: &str = "bootstrap";

/// Signed access token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAccessToken {
    /// Compact token.
    pub token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Port for issuing and verifying bearer tokens.
pub trait AccessTokenCodec: Send + Sync {
    /// Issues a token for an identity.
    fn issue(&self, identity: &AdminIdentity) -> AppResult<IssuedAccessToken>;

    /// Verifies signature and expiry and returns the embedded identity.
    fn verify(&self, token: &str) -> AppResult<AdminIdentity>;
}

/// Successful login or refresh payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    /// Authenticated admin.
    pub user_id: AdminUserId,
    /// Bearer token.
    pub access_token: String,
    /// Token expiry.
    pub token_expires: DateTime<Utc>,
    /// Opaque `"<session id>.<secret>"` token; each refresh replaces it.
    pub refresh_token: String,
    /// Refresh session expiry.
    pub refresh_token_expires: DateTime<Utc>,
}

/// Input for creating the first admin of the bootstrap tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapInput {
    /// Shared bootstrap secret.
    pub token: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional username.
    pub username: Option<String>,
}

/// Bootstrap configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSettings {
    /// Shared secret; bootstrap is disabled when `None`.
    pub token: Option<String>,
    /// Tenant that receives the first admin.
    pub tenant_id: TenantId,
}

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// First-admin bootstrap.
    pub bootstrap: BootstrapSettings,
    /// Lifetime of a refresh session, renewed by every refresh.
    pub refresh_token_ttl: Duration,
}

/// Application service for authentication flows.
#[derive(Clone)]
pub struct AuthService {
    admin_user_repository: Arc<dyn AdminUserRepository>,
    role_repository: Arc<dyn RoleRepository>,
    session_repository: Arc<dyn SessionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_codec: Arc<dyn AccessTokenCodec>,
    audit_repository: Arc<dyn AuditRepository>,
    bootstrap: BootstrapSettings,
    refresh_token_ttl: Duration,
}

impl AuthService {
    /// Creates a new authentication service.
    #[must_use]
    pub fn new(
        admin_user_repository: Arc<dyn AdminUserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        session_repository: Arc<dyn SessionRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_codec: Arc<dyn AccessTokenCodec>,
        audit_repository: Arc<dyn AuditRepository>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            admin_user_repository,
            role_repository,
            session_repository,
            password_hasher,
            token_codec,
            audit_repository,
            bootstrap: settings.bootstrap,
            refresh_token_ttl: settings.refresh_token_ttl,
        }
    }

    /// Authenticates with email and password, opens a refresh session and
    /// issues an access token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let invalid = || AppError::Unauthorized("invalid email or password".to_owned());

        let admin = match EmailAddress::new(email) {
            Ok(email) => {
                self.admin_user_repository
                    .find_admin_user_by_email(email.as_str())
                    .await?
            }
            Err(_) => None,
        };

        let Some(admin) = admin else {
            let _ = self.password_hasher.hash_password(password);
            return Err(invalid());
        };

        if !self
            .password_hasher
            .verify_password(password, &admin.password_hash)?
        {
            tracing::info!(admin_id = %admin.id, "login rejected");
            return Err(invalid());
        }

        let now = Utc::now();
        let (secret, secret_hash) = generate_secret()?;
        let session = SessionRecord {
            id: SessionId::new(),
            tenant_id: admin.tenant_id,
            admin_id: admin.id,
            secret_hash,
            expires_at: now + self.refresh_token_ttl,
            created_at: now,
            updated_at: now,
        };
        self.session_repository
            .create_session(session.clone())
            .await?;

        tracing::info!(
            admin_id = %admin.id,
            tenant_id = %admin.tenant_id,
            session_id = %session.id,
            "admin logged in"
        );
        self.login_result(&admin, session.id, &secret, session.expires_at)
    }

    /// Exchanges a refresh token for a new access token and rotates the
    /// session secret.
    ///
    /// Presenting an already rotated secret revokes the session.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<LoginResult> {
        let invalid = || AppError::Unauthorized("invalid or expired refresh token".to_owned());

        let (session_id, secret) = parse_refresh_token(refresh_token).ok_or_else(invalid)?;
        let Some(session) = self.session_repository.find_session(session_id).await? else {
            return Err(invalid());
        };

        let now = Utc::now();
        if session.expires_at <= now {
            self.session_repository.delete_session(session.id).await?;
            return Err(invalid());
        }

        if hash_secret(secret) != session.secret_hash {
            tracing::warn!(
                session_id = %session.id,
                admin_id = %session.admin_id,
                "stale refresh secret presented; revoking session"
            );
            self.session_repository.delete_session(session.id).await?;
            return Err(invalid());
        }

        let Some(admin) = self
            .admin_user_repository
            .find_admin_user(session.tenant_id, session.admin_id)
            .await?
        else {
            self.session_repository.delete_session(session.id).await?;
            return Err(invalid());
        };

        let (next_secret, next_hash) = generate_secret()?;
        let expires_at = now + self.refresh_token_ttl;
        if !self
            .session_repository
            .rotate_session(session.id, &session.secret_hash, next_hash, expires_at)
            .await?
        {
            return Err(invalid());
        }

        tracing::debug!(session_id = %session.id, admin_id = %admin.id, "session refreshed");
        self.login_result(&admin, session.id, &next_secret, expires_at)
    }

    /// Ends the actor's refresh session named by `refresh_token`.
    ///
    /// Sessions of other admins and unknown sessions are left untouched.
    pub async fn logout(&self, actor: &AdminIdentity, refresh_token: &str) -> AppResult<()> {
        let (session_id, _) = parse_refresh_token(refresh_token)
            .ok_or_else(|| AppError::Validation("malformed refresh token".to_owned()))?;

        let owned = self
            .session_repository
            .find_session(session_id)
            .await?
            .is_some_and(|session| {
                session.admin_id == actor.admin_id() && session.tenant_id == actor.tenant_id()
            });
        if owned {
            self.session_repository.delete_session(session_id).await?;
            tracing::info!(
                session_id = %session_id,
                admin_id = %actor.admin_id(),
                "admin logged out"
            );
        }

        Ok(())
    }

    fn login_result(
        &self,
        admin: &AdminUserRecord,
        session_id: SessionId,
        secret: &str,
        refresh_token_expires: DateTime<Utc>,
    ) -> AppResult<LoginResult> {
        let issued = self.token_codec.issue(&identity_of(admin))?;

        Ok(LoginResult {
            user_id: admin.id,
            access_token: issued.token,
            token_expires: issued.expires_at,
            refresh_token: format!("{session_id}.{secret}"),
            refresh_token_expires,
        })
    }

    /// Verifies a bearer token.
    pub fn authenticate(&self, token: &str) -> AppResult<AdminIdentity> {
        self.token_codec.verify(token)
    }

    /// Creates the `Super Admin` role and the first admin of the bootstrap tenant.
    pub async fn bootstrap(&self, input: BootstrapInput) -> AppResult<AdminUserRecord> {
        let Some(expected_token) = self.bootstrap.token.as_deref() else {
            return Err(AppError::Forbidden("bootstrap is disabled".to_owned()));
        };
        if input.token != expected_token {
            return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()));
        }

        let tenant_id = self.bootstrap.tenant_id;
        if self
            .admin_user_repository
            .count_admin_users(tenant_id)
            .await?
            > 0
        {
            return Err(AppError::Conflict(
                "tenant already has an admin".to_owned(),
            ));
        }

        let email = EmailAddress::new(input.email)?;
        let username = input
            .username
            .filter(|value| !value.trim().is_empty())
            .map(Username::new)
            .transpose()?;
        let first_name = required_text(input.first_name, "first name", PERSON_NAME_MAX_LENGTH)?;
        let last_name = required_text(input.last_name, "last name", PERSON_NAME_MAX_LENGTH)?;
        validate_password(&input.password)?;

        self.ensure_login_available(&email, username.as_ref()).await?;
        let password_hash = self.password_hasher.hash_password(&input.password)?;

        let now = Utc::now();
        let (role_id, created_role) = self.super_admin_role(tenant_id).await?;

        let admin = AdminUserRecord {
            id: AdminUserId::new(),
            tenant_id,
            username: username.map(String::from),
            email: email.into(),
            full_name: full_name(&first_name, &last_name),
            first_name,
            last_name,
            bio: None,
            image: None,
            phone: None,
            role_id,
            password_hash,
            verified_at: Some(now),
            created_by: BOOTSTRAP_SUBJECT.to_owned(),
            updated_by: BOOTSTRAP_SUBJECT.to_owned(),
            created_at: now,
            updated_at: now,
        };
        if let Err(error) = self
            .admin_user_repository
            .create_admin_user(admin.clone())
            .await
        {
            if created_role {
                self.discard_role(tenant_id, role_id).await;
            }
            return Err(error);
        }

        self.audit_repository
            .append_event(AuditEvent {
                tenant_id,
                subject: BOOTSTRAP_SUBJECT.to_owned(),
                action: AuditAction::TenantBootstrapped,
                resource_type: "admin_user".to_owned(),
                resource_id: admin.id.to_string(),
                detail: Some(format!("first admin '{}'", admin.email)),
            })
            .await?;

        tracing::info!(admin_id = %admin.id, tenant_id = %tenant_id, "tenant bootstrapped");
        Ok(admin)
    }

    async fn ensure_login_available(
        &self,
        email: &EmailAddress,
        username: Option<&Username>,
    ) -> AppResult<()> {
        if self
            .admin_user_repository
            .find_admin_user_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "an admin with email '{}' already exists",
                email.as_str()
            )));
        }

        if let Some(username) = username
            && self
                .admin_user_repository
                .find_admin_user_by_username(username.as_str())
                .await?
                .is_some()
        {
            return Err(AppError::Conflict(format!(
                "an admin with username '{}' already exists",
                username.as_str()
            )));
        }

        Ok(())
    }

    /// Returns the tenant's `Super Admin` role and whether this call created it.
    ///
    /// A tenant without admins can still hold the role after an interrupted
    /// bootstrap; nobody is assigned to it, so it is reused.
    async fn super_admin_role(&self, tenant_id: TenantId) -> AppResult<(RoleId, bool)> {
        if let Some(mut existing) = self
            .role_repository
            .find_role_by_name(tenant_id, SUPER_ADMIN_ROLE_NAME)
            .await?
        {
            if existing.grants != [Grant::MANAGE_ALL] {
                existing.grants = vec![Grant::MANAGE_ALL];
                existing.updated_by = BOOTSTRAP_SUBJECT.to_owned();
                existing.updated_at = Utc::now();
                self.role_repository.update_role(existing.clone()).await?;
            }

            tracing::info!(
                role_id = %existing.id,
                tenant_id = %tenant_id,
                "reusing unassigned super admin role"
            );
            return Ok((existing.id, false));
        }

        let now = Utc::now();
        let role = RoleRecord {
            id: RoleId::new(),
            tenant_id,
            name: SUPER_ADMIN_ROLE_NAME.to_owned(),
            description: Some("Full access to every resource".to_owned()),
            grants: vec![Grant::MANAGE_ALL],
            created_by: BOOTSTRAP_SUBJECT.to_owned(),
            updated_by: BOOTSTRAP_SUBJECT.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.role_repository.create_role(role.clone()).await?;
        Ok((role.id, true))
    }

    async fn discard_role(&self, tenant_id: TenantId, role_id: RoleId) {
        if let Err(error) = self
            .role_repository
            .soft_delete_role(tenant_id, role_id, BOOTSTRAP_SUBJECT)
            .await
        {
            tracing::error!(
                role_id = %role_id,
                tenant_id = %tenant_id,
                error = %error,
                "failed to discard super admin role after bootstrap failure"
            );
        }
    }
}

fn parse_refresh_token(token: &str) -> Option<(SessionId, &str)> {
    let (session_id, secret) = token.trim().split_once('.')?;
    if secret.is_empty() {
        return None;
    }

    Some((session_id.parse().ok()?, secret))
}

fn identity_of(admin: &AdminUserRecord) -> AdminIdentity {
    AdminIdentity::new(
        admin.id,
        admin.full_name.clone(),
        Some(admin.email.clone()),
        admin.tenant_id,
    )
}
