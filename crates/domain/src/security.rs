use std::fmt::{Display, Formatter};
use std::str::FromStr;

use atrium_core::AppError;
use serde::{Deserialize, Serialize};

/// Actions a grant can authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new resources.
    Create,
    /// Read resources.
    Read,
    /// Update existing resources.
    Update,
    /// Delete resources.
    Delete,
    /// Every action, including ones added later.
    Manage,
}

impl Action {
    /// Returns the stable wire value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Action] = &[
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::Manage,
        ];

        ALL
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "manage" => Ok(Self::Manage),
            _ => Err(AppError::Validation(format!("unknown action '{value}'"))),
        }
    }
}

/// Resource types a grant can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    /// End-user accounts.
    User,
    /// Roles and their grants.
    Role,
    /// Audit log entries.
    Log,
    /// Admin user accounts.
    Admin,
    /// Content pages.
    Page,
    /// Wildcard subject matching every resource type.
    All,
}

impl Subject {
    /// Returns the stable wire value for this subject.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Role => "Role",
            Self::Log => "Log",
            Self::Admin => "Admin",
            Self::Page => "Page",
            Self::All => "all",
        }
    }

    /// Returns every concrete subject, excluding the wildcard.
    #[must_use]
    pub fn concrete() -> &'static [Self] {
        const CONCRETE: &[Subject] = &[
            Subject::User,
            Subject::Role,
            Subject::Log,
            Subject::Admin,
            Subject::Page,
        ];

        CONCRETE
    }
}

impl FromStr for Subject {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "User" => Ok(Self::User),
            "Role" => Ok(Self::Role),
            "Log" => Ok(Self::Log),
            "Admin" => Ok(Self::Admin),
            "Page" => Ok(Self::Page),
            "all" => Ok(Self::All),
            _ => Err(AppError::Validation(format!("unknown subject '{value}'"))),
        }
    }
}

/// One `(action, subject)` permission unit stored on a role.
///
/// The wire and storage form is `"action:subject"`, for example `read:Role`
/// or `manage:all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Grant {
    action: Action,
    subject: Subject,
}

impl Grant {
    /// Full access to every resource.
    pub const MANAGE_ALL: Self = Self::new(Action::Manage, Subject::All);

    /// Creates a grant.
    #[must_use]
    pub const fn new(action: Action, subject: Subject) -> Self {
        Self { action, subject }
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the targeted subject.
    #[must_use]
    pub fn subject(&self) -> Subject {
        self.subject
    }

    /// Parses a transport value into a grant.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }

    /// Returns the grant catalogue offered to role editors.
    #[must_use]
    pub fn catalogue() -> Vec<Self> {
        let mut grants: Vec<Self> = [Subject::Admin, Subject::User, Subject::Role, Subject::Page]
            .into_iter()
            .flat_map(|subject| {
                [Action::Read, Action::Create, Action::Update, Action::Delete]
                    .into_iter()
                    .map(move |action| Self::new(action, subject))
            })
            .collect();
        grants.push(Self::new(Action::Read, Subject::Log));
        grants.push(Self::MANAGE_ALL);
        grants
    }
}

impl Display for Grant {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.action.as_str(), self.subject.as_str())
    }
}

impl FromStr for Grant {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((action, subject)) = value.trim().split_once(':') else {
            return Err(AppError::Validation(format!(
                "grant '{value}' must have the form 'action:subject'"
            )));
        };

        Ok(Self::new(Action::from_str(action)?, Subject::from_str(subject)?))
    }
}

impl Serialize for Grant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Grant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(value.as_str()).map_err(serde::de::Error::custom)
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when the first admin and super role are created.
    TenantBootstrapped,
    /// Emitted when an admin user is created.
    AdminUserCreated,
    /// Emitted when an admin user profile is updated.
    AdminUserUpdated,
    /// Emitted when an admin user changes their password.
    AdminUserPasswordChanged,
    /// Emitted when an admin user is soft-deleted.
    AdminUserDeleted,
    /// Emitted when a role is created.
    RoleCreated,
    /// Emitted when a role is updated.
    RoleUpdated,
    /// Emitted when a role is soft-deleted.
    RoleDeleted,
    /// Emitted when a page is created.
    PageCreated,
    /// Emitted when a page is updated.
    PageUpdated,
    /// Emitted when a page is soft-deleted.
    PageDeleted,
    /// Emitted when an end user is created.
    UserCreated,
    /// Emitted when an end user is updated.
    UserUpdated,
    /// Emitted when an end user is soft-deleted.
    UserDeleted,
    /// Emitted when a post is created.
    PostCreated,
    /// Emitted when a post is updated.
    PostUpdated,
    /// Emitted when a post is soft-deleted.
    PostDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenantBootstrapped => "tenant.bootstrapped",
            Self::AdminUserCreated => "admin_user.created",
            Self::AdminUserUpdated => "admin_user.updated",
            Self::AdminUserPasswordChanged => "admin_user.password_changed",
            Self::AdminUserDeleted => "admin_user.deleted",
            Self::RoleCreated => "role.created",
            Self::RoleUpdated => "role.updated",
            Self::RoleDeleted => "role.deleted",
            Self::PageCreated => "page.created",
            Self::PageUpdated => "page.updated",
            Self::PageDeleted => "page.deleted",
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
            Self::PostCreated => "post.created",
            Self::PostUpdated => "post.updated",
            Self::PostDeleted => "post.deleted",
        }
    }
}
