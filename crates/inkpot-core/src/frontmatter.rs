//! Frontmatter parsing and re-serialization.
//!
//! Articles are markdown files with a YAML block between `---` delimiters.
//! Parsing produces two views of the same block: a typed [`Frontmatter`]
//! for the fields the engine knows about, and a raw [`serde_yaml::Mapping`]
//! preserving unknown keys so a rewrite (the draft toggle) round-trips
//! everything the author put there.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// Typed view of the known frontmatter fields.
///
/// Unknown keys are not represented here; they live in the raw mapping
/// returned alongside this struct by [`parse_document`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    /// Article title. May be empty.
    pub title: String,
    /// Short description for excerpts and SEO.
    pub description: String,
    /// Publication date as written; parsed leniently by [`parse_date`].
    pub date: Option<String>,
    /// Tag list.
    pub tags: Vec<String>,
    /// Category list.
    pub categories: Vec<String>,
    /// Author display name.
    pub author: String,
    /// Draft flag; drafts are invisible to the published view.
    pub draft: bool,
    /// Featured flag; boosts search scores.
    pub featured: bool,
    /// Explicit article kind, if the author set one.
    #[serde(rename = "type")]
    pub article_type: Option<String>,
    /// Explicit slug override.
    pub slug: Option<String>,
    /// External URL for link posts; its presence infers the link kind.
    pub link_url: Option<String>,
}

/// A parsed article file: typed frontmatter, the raw mapping behind it, and
/// the trimmed markdown body.
#[derive(Debug, Clone)]
pub struct Document {
    /// Typed view of the known keys.
    pub frontmatter: Frontmatter,
    /// Every frontmatter key as authored, unknown ones included.
    pub raw: serde_yaml::Mapping,
    /// Markdown body after the closing delimiter, trimmed.
    pub body: String,
}

/// Split and parse a raw article file.
///
/// The file must contain a complete frontmatter block: an opening `---`,
/// the YAML, and a closing `---`. Files with fewer than three segments are
/// rejected, as is YAML that fails to deserialize.
///
/// # Errors
///
/// Returns [`Error::Parse`] for a missing delimiter pair or invalid YAML.
pub fn parse_document(content: &str) -> Result<Document> {
    let parts: Vec<&str> = content.splitn(3, "---").collect();
    if parts.len() < 3 {
        return Err(Error::Parse(
            "missing frontmatter delimiters (expected '---' pair)".into(),
        ));
    }

    let yaml = parts[1];
    let body = parts[2].trim().to_string();

    let raw: serde_yaml::Mapping = if yaml.trim().is_empty() {
        serde_yaml::Mapping::new()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| Error::Parse(format!("invalid frontmatter: {e}")))?
    };

    let frontmatter: Frontmatter =
        serde_yaml::from_value(serde_yaml::Value::Mapping(raw.clone()))
            .map_err(|e| Error::Parse(format!("invalid frontmatter: {e}")))?;

    Ok(Document {
        frontmatter,
        raw,
        body,
    })
}

/// Parse a frontmatter date string.
///
/// Accepts RFC 3339 (`2025-06-15T10:00:00Z`), a space-separated datetime
/// (`2025-06-15 10:00:00`), and a bare date (`2025-06-15`, midnight UTC).
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// Set the `draft` key in a raw frontmatter mapping.
pub fn set_draft(raw: &mut serde_yaml::Mapping, draft: bool) {
    raw.insert(
        serde_yaml::Value::String("draft".into()),
        serde_yaml::Value::Bool(draft),
    );
}

/// Reassemble a full article file from a raw mapping and body.
///
/// The inverse of [`parse_document`] up to YAML key ordering: unknown keys
/// survive because the mapping carries everything that was authored.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the mapping fails to serialize.
pub fn render_document(raw: &serde_yaml::Mapping, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(raw)
        .map_err(|e| Error::Parse(format!("failed to serialize frontmatter: {e}")))?;
    // serde_yaml emits bare mappings without a document marker; keep the
    // reassembly layout fixed regardless.
    let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);
    Ok(format!("---\n{yaml}---\n\n{body}\n"))
}
