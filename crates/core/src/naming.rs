//! Slug validation for templates and apps.
//!
//! Slugs are URL path segments and database keys, so the accepted shape is
//! deliberately narrow: lowercase kebab-case, starting and ending with an
//! alphanumeric character.

use crate::error::CoreError;

/// Maximum accepted slug length.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Validate a slug: non-empty, at most [`MAX_SLUG_LENGTH`] chars, lowercase
/// ASCII alphanumerics separated by single hyphens.
///
/// # Examples
///
/// ```
/// use steward_core::naming::validate_slug;
///
/// assert!(validate_slug("chat-bot-2").is_ok());
/// assert!(validate_slug("Chat").is_err());
/// assert!(validate_slug("-leading").is_err());
/// assert!(validate_slug("double--hyphen").is_err());
/// ```
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "slug must be at most {MAX_SLUG_LENGTH} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "slug may only contain lowercase letters, digits, and hyphens".into(),
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::Validation(
            "slug must not start or end with a hyphen or contain consecutive hyphens".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_kebab_case() {
        assert!(validate_slug("support-agent").is_ok());
        assert!(validate_slug("a").is_ok());
        assert!(validate_slug("v2-beta-3").is_ok());
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Upper").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("under_score").is_err());
        assert!(validate_slug("-x").is_err());
        assert!(validate_slug("x-").is_err());
        assert!(validate_slug("a--b").is_err());
    }

    #[test]
    fn test_rejects_overlong() {
        let slug = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(validate_slug(&slug).is_err());
    }
}
