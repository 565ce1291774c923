use std::str::FromStr;

use atrium_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum length of a page's meta keywords.
pub const META_KEYWORDS_MAX_LENGTH: usize = 160;

/// Maximum length of a page's meta description.
pub const META_DESCRIPTION_MAX_LENGTH: usize = 240;

/// Maximum length of a translation locale code.
pub const LOCALE_CODE_MAX_LENGTH: usize = 10;

/// Publication state of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// Work in progress, hidden from public listings.
    Draft,
    /// Visible on public endpoints.
    Published,
    /// Retired, hidden from public listings.
    Archived,
}

impl PageStatus {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for PageStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(AppError::Validation(format!(
                "unknown page status '{value}'"
            ))),
        }
    }
}

/// URL slug: lowercase ASCII words joined by single hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSlug(String);

impl PageSlug {
    /// Creates a validated slug.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        let valid = !trimmed.is_empty()
            && trimmed.len() <= 200
            && trimmed
                .split('-')
                .all(|segment| {
                    !segment.is_empty()
                        && segment
                            .chars()
                            .all(|character| character.is_ascii_lowercase() || character.is_ascii_digit())
                });

        if !valid {
            return Err(AppError::Validation(format!(
                "slug '{trimmed}' must be lowercase words separated by single hyphens"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PageSlug> for String {
    fn from(value: PageSlug) -> Self {
        value.0
    }
}

/// Translation locale code such as `en` or `vi-VN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Creates a validated locale code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        let valid = !trimmed.is_empty()
            && trimmed.len() <= LOCALE_CODE_MAX_LENGTH
            && trimmed
                .chars()
                .all(|character| character.is_ascii_alphabetic() || character == '-')
            && !trimmed.starts_with('-')
            && !trimmed.ends_with('-');

        if !valid {
            return Err(AppError::Validation(format!(
                "locale code '{trimmed}' is invalid"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the locale code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<LocaleCode> for String {
    fn from(value: LocaleCode) -> Self {
        value.0
    }
}
