use std::fmt::{Display, Formatter};
use std::str::FromStr;

use atrium_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|_| {
                    AppError::Validation(format!("invalid {} '{value}'", $label))
                })
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for an admin user.
    AdminUserId,
    "admin user id"
);

uuid_identifier!(
    /// Unique identifier for a role.
    RoleId,
    "role id"
);

uuid_identifier!(
    /// Unique identifier for a page.
    PageId,
    "page id"
);

uuid_identifier!(
    /// Unique identifier for a refresh session.
    SessionId,
    "session id"
);

uuid_identifier!(
    /// Unique identifier for an end-user account.
    UserId,
    "user id"
);

uuid_identifier!(
    /// Unique identifier for a post.
    PostId,
    "post id"
);
