//! Post value rules.

use atrium_core::AppResult;

use crate::PageSlug;

/// Derives a slug from a post title.
///
/// ASCII letters and digits are lower-cased; every other run of characters
/// collapses into one hyphen.
pub fn slug_from_title(title: &str) -> AppResult<PageSlug> {
    let mut slug = String::with_capacity(title.len());
    for character in title.trim().chars() {
        if character.is_ascii_alphanumeric() {
            slug.push(character.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');

    PageSlug::new(slug)
}

#[cfg(test)]
mod tests {
    use super::slug_from_title;

    #[test]
    fn punctuation_runs_become_single_hyphens() {
        let slug = slug_from_title("  Hello, World!  Notes for 2026 ");
        assert_eq!(
            slug.ok().map(String::from),
            Some("hello-world-notes-for-2026".to_owned())
        );
    }

    #[test]
    fn title_without_ascii_words_has_no_slug() {
        assert!(slug_from_title("¡¿!?").is_err());
    }
}
