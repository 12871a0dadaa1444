//! Shared validation helpers for request DTOs.
//!
//! Used by the `validator` derive on the DTOs in `folio-db`. Kept here so
//! the rules have a single definition and can be unit tested without a
//! database.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::status::ALL_STATUSES;

/// Slug pattern: lowercase alphanumeric runs joined by single hyphens.
pub static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug regex is valid"));

/// Every entry in a string-list field must be non-empty.
pub fn non_empty_strings(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|s| s.is_empty()) {
        let mut err = ValidationError::new("non_empty_strings");
        err.message = Some("entries must be non-empty strings".into());
        return Err(err);
    }
    Ok(())
}

/// `status` must be one of the known publication statuses.
pub fn valid_status(status: &str) -> Result<(), ValidationError> {
    if !ALL_STATUSES.contains(&status) {
        let mut err = ValidationError::new("valid_status");
        err.message = Some("status must be 'draft' or 'published'".into());
        return Err(err);
    }
    Ok(())
}
