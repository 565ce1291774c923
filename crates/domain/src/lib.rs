//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod admin_user;
mod identity;
mod ids;
mod page;
mod post;
mod security;

pub use admin_user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PERSON_NAME_MAX_LENGTH,
    USERNAME_MAX_LENGTH, Username, full_name, validate_password,
};
pub use identity::AdminIdentity;
pub use ids::{AdminUserId, PageId, PostId, RoleId, SessionId, UserId};
pub use page::{
    LOCALE_CODE_MAX_LENGTH, LocaleCode, META_DESCRIPTION_MAX_LENGTH, META_KEYWORDS_MAX_LENGTH,
    PageSlug, PageStatus,
};
pub use post::slug_from_title;
pub use security::{Action, AuditAction, Grant, Subject};
