//! Slug generation and validation.
//!
//! Slugs are the primary keys of the corpus and double as file stems on
//! disk, so validation rejects anything that could escape the articles
//! directory.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum accepted slug length on the public contract.
pub const MAX_SLUG_LEN: usize = 200;

/// Pattern every externally-supplied slug must match.
static SLUG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)] // pattern is a compile-time constant
    Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$|^[a-z0-9]$").expect("valid slug pattern")
});

/// Derive a slug from a title.
///
/// Lowercases the title, deletes punctuation, and joins the remaining words
/// with single hyphens. Runs of whitespace or hyphens collapse into one
/// separator and leading/trailing separators are trimmed, so
/// `"Go 1.21: What's New?"` becomes `"go-121-whats-new"`.
///
/// Returns an empty string when nothing slug-worthy survives; callers fall
/// back to a timestamp-based identifier.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.chars() {
        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(lower);
            } else if lower.is_whitespace() || lower == '-' || lower == '_' {
                pending_separator = true;
            }
            // Everything else (punctuation) is deleted without separating.
        }
    }

    slug
}

/// Validate a slug against the public service contract.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the slug is empty, longer than
/// [`MAX_SLUG_LEN`], or does not match the contract pattern
/// (lowercase alphanumerics and interior hyphens only).
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(Error::Validation("slug cannot be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(Error::Validation(format!(
            "slug exceeds maximum length of {MAX_SLUG_LEN} characters"
        )));
    }
    if !SLUG_PATTERN.is_match(slug) {
        return Err(Error::Validation(format!("invalid slug format: '{slug}'")));
    }
    Ok(())
}

/// Validate that a slug is safe to resolve to a path inside the articles
/// directory.
///
/// This is the lighter check used by the mutation path: non-empty after
/// trimming, and free of traversal sequences.
///
/// # Errors
///
/// Returns [`Error::Validation`] for empty slugs and for slugs containing
/// `..`, `/`, or `\`.
pub fn ensure_path_safe(slug: &str) -> Result<()> {
    let trimmed = slug.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("slug cannot be empty".into()));
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(Error::Validation(format!(
            "slug '{trimmed}' contains path traversal characters"
        )));
    }
    Ok(())
}
