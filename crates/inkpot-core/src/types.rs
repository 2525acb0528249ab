//! Core data structures for the article engine.
//!
//! This module defines the types shared by the repository, cache, search,
//! and composite service: the [`Article`] entity itself, the derived
//! [`Stats`] aggregate, and the search-side types ([`SearchResult`],
//! [`SearchFilters`], [`SearchIndex`]).
//!
//! ## Ownership
//!
//! Articles are handed out as `Arc<Article>`. The steady state is immutable:
//! a reload replaces the whole set, and the only mutation path (the draft
//! toggle) swaps in a rebuilt `Arc` under the repository's write lock.
//! Callers therefore never observe a torn article.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Kind of an article, controlling which templates and feeds pick it up.
///
/// The kind is taken from frontmatter when present; otherwise it is
/// inferred: a `link_url` key makes a [`ArticleType::Link`], a short
/// untitled body makes a [`ArticleType::Thought`], and everything else is a
/// regular [`ArticleType::Article`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    /// A regular long-form article.
    #[default]
    Article,
    /// A short untitled note.
    Thought,
    /// A link post pointing at an external URL.
    Link,
    /// An ask-me-anything entry.
    Ama,
}

impl ArticleType {
    /// Parse a frontmatter `type` value; unknown strings fall back to
    /// [`ArticleType::Article`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "thought" => Self::Thought,
            "link" => Self::Link,
            "ama" => Self::Ama,
            _ => Self::Article,
        }
    }
}

/// A markdown file with YAML frontmatter, plus its derived metadata, as
/// represented in memory.
///
/// `content` holds the raw markdown body and is immutable after load.
/// Rendered HTML is *not* stored here: it is a pure function of `content`
/// and processor configuration, derived on demand and cached under a
/// content hash (see the cache coordinator's `content:` namespace).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// URL-safe identifier; the primary key within the corpus.
    pub slug: String,

    /// Title from frontmatter. May be empty for thought-type entries.
    pub title: String,

    /// Short description used for excerpts and SEO metadata.
    #[serde(default)]
    pub description: String,

    /// Raw markdown body (everything after the closing `---`).
    pub content: String,

    /// Plain-text excerpt derived from the body.
    #[serde(default)]
    pub excerpt: String,

    /// Publication timestamp; the descending sort key for every listing.
    pub date: DateTime<Utc>,

    /// Tags, compared case-insensitively.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Categories, compared case-insensitively.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Author display name.
    #[serde(default)]
    pub author: String,

    /// When `true`, the article is invisible to every published-view query.
    #[serde(default)]
    pub draft: bool,

    /// When `true`, search scores are boosted by ×1.2.
    #[serde(default)]
    pub featured: bool,

    /// Kind of the article (explicit or inferred).
    #[serde(default)]
    pub article_type: ArticleType,

    /// Number of whitespace-separated words in the body.
    #[serde(default)]
    pub word_count: usize,

    /// Estimated reading time in minutes. Zero only for empty content.
    #[serde(default)]
    pub reading_time: u32,

    /// Filesystem mtime of the source file at load.
    pub last_modified: DateTime<Utc>,
}

impl Article {
    /// Case-insensitive tag membership test.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive category membership test.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Tag (or category) paired with its usage count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    /// The tag string, lowercased.
    pub tag: String,
    /// Number of published articles carrying it.
    pub count: usize,
}

/// Derived corpus aggregate, computed on demand and cacheable under the
/// `stats` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// All articles, drafts included.
    pub total_articles: usize,
    /// Articles with `draft = false`.
    pub published_count: usize,
    /// Articles with `draft = true`.
    pub draft_count: usize,
    /// Distinct tags across published articles.
    pub tag_count: usize,
    /// Distinct categories across published articles.
    pub category_count: usize,
    /// Top 10 tags by frequency (count desc, tag asc).
    pub top_tags: Vec<TagCount>,
    /// The 5 most recent published articles.
    pub recent_articles: Vec<Arc<Article>>,
}

/// Field labels contributing to a search match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    /// The query term appeared in the title.
    Title,
    /// The query term appeared in the description.
    Description,
    /// A tag equaled the query term.
    Tags,
    /// A category equaled the query term.
    Categories,
    /// The query term appeared in the body.
    Content,
}

/// An article paired with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// The matched article.
    pub article: Arc<Article>,
    /// Non-negative relevance score; results are ordered by it, descending.
    pub score: f64,
    /// Deduplicated labels of the fields that contributed to the score.
    pub matched_fields: Vec<MatchedField>,
}

/// Filter set for [`search_with_filters`](crate::search::SearchService::search_with_filters).
///
/// List filters use any-match semantics and compare case-insensitively.
/// Date bounds are `YYYY-MM-DD`, inclusive; `date_to` extends to the end of
/// its day. A malformed bound is logged and ignored while the other bound
/// still applies.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Restrict results to non-draft articles.
    pub only_published: bool,
    /// Restrict results to featured articles.
    pub only_featured: bool,
    /// Keep articles carrying any of these tags.
    pub tags: Vec<String>,
    /// Keep articles carrying any of these categories.
    pub categories: Vec<String>,
    /// Inclusive lower date bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
}

/// Inverted index over the published article set.
///
/// Three maps from lowercase token to slugs, plus a slug→article snapshot
/// taken at build time so indexed lookups never dangle across a reload
/// swap. The content index is bounded: only the first
/// [`CONTENT_INDEX_TOKEN_LIMIT`](crate::search::CONTENT_INDEX_TOKEN_LIMIT)
/// body tokens per article are indexed.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    /// Title token → slugs.
    pub title_index: HashMap<String, Vec<String>>,
    /// Body token → slugs (bounded per article).
    pub content_index: HashMap<String, Vec<String>>,
    /// Whole lowercase tag → slugs.
    pub tag_index: HashMap<String, Vec<String>>,
    /// Snapshot of the published articles the index was built from.
    pub articles: HashMap<String, Arc<Article>>,
}

impl SearchIndex {
    /// Number of distinct indexed terms across all three indices.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.title_index.len() + self.content_index.len() + self.tag_index.len()
    }

    /// Whether the index contains no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}
