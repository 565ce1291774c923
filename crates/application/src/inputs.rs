use atrium_core::{AppResult, NonEmptyString};

/// Trims an optional text field; blank values become `None`.
pub(crate) fn optional_text(
    value: Option<String>,
    field: &str,
    max_chars: usize,
) -> AppResult<Option<String>> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(|value| NonEmptyString::bounded(value, field, max_chars).map(String::from))
        .transpose()
}

/// Validates a required, bounded text field.
pub(crate) fn required_text(value: String, field: &str, max_chars: usize) -> AppResult<String> {
    NonEmptyString::bounded(value, field, max_chars).map(String::from)
}
