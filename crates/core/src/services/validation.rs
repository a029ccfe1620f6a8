//! Shared input validation helpers.

use folio_common::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Lowercase words joined by single hyphens.
#[allow(clippy::expect_used)]
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Letters, digits and underscores.
#[allow(clippy::expect_used)]
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username regex"));

/// Validate a URL slug.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() <= 200 && SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("Slug may only contain lowercase letters, digits and hyphens".into()))
    }
}

/// Validate a username.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("username")
            .with_message("Username may only contain letters, digits and underscores".into()))
    }
}

/// Treat blank strings as absent.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed text whose length (in characters) lies within `min..=max`.
pub fn bounded_text(value: &str, field: &str, min: usize, max: usize) -> AppResult<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if len > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}
