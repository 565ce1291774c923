use atrium_core::TenantId;

use crate::AdminUserId;

/// Authenticated admin principal carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    admin_id: AdminUserId,
    subject: String,
    display_name: String,
    email: Option<String>,
    tenant_id: TenantId,
}

impl AdminIdentity {
    /// Creates an identity from verified token claims.
    #[must_use]
    pub fn new(
        admin_id: AdminUserId,
        display_name: impl Into<String>,
        email: Option<String>,
        tenant_id: TenantId,
    ) -> Self {
        Self {
            admin_id,
            subject: admin_id.to_string(),
            display_name: display_name.into(),
            email,
            tenant_id,
        }
    }

    /// Returns the admin the token was issued for.
    #[must_use]
    pub fn admin_id(&self) -> AdminUserId {
        self.admin_id
    }

    /// Returns the admin id in the textual form recorded by audit columns.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current admin.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if one was embedded in the token.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the tenant linked to the identity.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
