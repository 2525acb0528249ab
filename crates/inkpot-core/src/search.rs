//! Full-text search over the article set.
//!
//! Two retrieval paths share one tokenizer. The direct path scans articles
//! and scores every field with occurrence counting; the indexed path walks
//! the prebuilt inverted index with flat per-term weights and is the hot
//! path for serving queries. The indexed weights are a deliberate
//! approximation of the direct ones: no content-frequency multiplier and
//! no description/category fields.

use crate::types::{Article, MatchedField, SearchFilters, SearchIndex, SearchResult};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// Direct-path weight for a title substring match, per query term.
pub const TITLE_WEIGHT: f64 = 10.0;
/// Direct-path weight for a description substring match, per query term.
pub const DESCRIPTION_WEIGHT: f64 = 5.0;
/// Direct-path weight for an exact tag or category match, per query term.
pub const TAG_WEIGHT: f64 = 5.0;
/// Direct-path weight per content occurrence.
pub const CONTENT_WEIGHT: f64 = 1.0;
/// Score multiplier for featured articles.
pub const FEATURED_BOOST: f64 = 1.2;

/// Indexed-path weight for a title token match.
pub const INDEX_TITLE_WEIGHT: f64 = 10.0;
/// Indexed-path weight for a tag match.
pub const INDEX_TAG_WEIGHT: f64 = 5.0;
/// Indexed-path weight for a content token match.
pub const INDEX_CONTENT_WEIGHT: f64 = 2.0;

/// Only the first this-many body tokens per article are indexed.
pub const CONTENT_INDEX_TOKEN_LIMIT: usize = 100;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did",
        "will", "would", "could", "should", "this", "that", "these", "those",
    ]
    .into_iter()
    .collect()
});

/// Lowercase and split on non-alphanumeric codepoints, dropping
/// single-character tokens and stop words.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 1)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Stateless search operations over article slices and prebuilt indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchService;

impl SearchService {
    /// Creates a search service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Field-weighted direct search.
    ///
    /// Drafts never match. Results carry a positive score and the
    /// deduplicated set of contributing fields, ordered score descending.
    /// A `limit` of zero means unbounded.
    #[must_use]
    pub fn search(&self, articles: &[Arc<Article>], query: &str, limit: usize) -> Vec<SearchResult> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = articles
            .iter()
            .filter(|article| !article.draft)
            .filter_map(|article| score_article(article, &terms))
            .collect();

        sort_and_truncate(&mut results, limit);
        results
    }

    /// Search restricted to title matches.
    #[must_use]
    pub fn search_in_title(
        &self,
        articles: &[Arc<Article>],
        query: &str,
        limit: usize,
    ) -> Vec<SearchResult> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<SearchResult> = articles
            .iter()
            .filter(|article| !article.draft)
            .filter_map(|article| {
                let title = article.title.to_lowercase();
                let mut score = 0.0;
                for term in &terms {
                    if title.contains(term.as_str()) {
                        score += TITLE_WEIGHT;
                    }
                }
                if score <= 0.0 {
                    return None;
                }
                if article.featured {
                    score *= FEATURED_BOOST;
                }
                Some(SearchResult {
                    article: Arc::clone(article),
                    score,
                    matched_fields: vec![MatchedField::Title],
                })
            })
            .collect();

        sort_and_truncate(&mut results, limit);
        results
    }

    /// Published articles carrying the given tag, newest first.
    #[must_use]
    pub fn search_by_tag(&self, articles: &[Arc<Article>], tag: &str) -> Vec<Arc<Article>> {
        articles
            .iter()
            .filter(|article| !article.draft && article.has_tag(tag))
            .cloned()
            .collect()
    }

    /// Published articles in the given category, newest first.
    #[must_use]
    pub fn search_by_category(
        &self,
        articles: &[Arc<Article>],
        category: &str,
    ) -> Vec<Arc<Article>> {
        articles
            .iter()
            .filter(|article| !article.draft && article.has_category(category))
            .cloned()
            .collect()
    }

    /// Direct search over the subset passing the given filters.
    #[must_use]
    pub fn search_with_filters(
        &self,
        articles: &[Arc<Article>],
        query: &str,
        filters: &SearchFilters,
    ) -> Vec<SearchResult> {
        let filtered: Vec<Arc<Article>> = articles
            .iter()
            .filter(|article| passes_filters(article, filters))
            .cloned()
            .collect();
        self.search(&filtered, query, 0)
    }

    /// Suggest completion terms for a prefix from published titles and tags.
    ///
    /// Candidates must start with the prefix (case-insensitively) and be
    /// strictly longer than it. Ordered by frequency descending, then
    /// alphabetically; `limit` of zero means unbounded.
    #[must_use]
    pub fn get_suggestions(
        &self,
        articles: &[Arc<Article>],
        prefix: &str,
        limit: usize,
    ) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for article in articles.iter().filter(|a| !a.draft) {
            for token in tokenize(&article.title) {
                if token.len() > prefix.len() && token.starts_with(&prefix) {
                    *counts.entry(token).or_insert(0) += 1;
                }
            }
            for tag in &article.tags {
                let tag = tag.to_lowercase();
                if tag.len() > prefix.len() && tag.starts_with(&prefix) {
                    *counts.entry(tag).or_insert(0) += 1;
                }
            }
        }

        let mut suggestions: Vec<(String, usize)> = counts.into_iter().collect();
        suggestions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let mut terms: Vec<String> = suggestions.into_iter().map(|(term, _)| term).collect();
        if limit > 0 {
            terms.truncate(limit);
        }
        terms
    }

    /// Build the inverted index over the published subset of `articles`.
    ///
    /// Title tokens and tags are indexed in full; body tokens are capped at
    /// [`CONTENT_INDEX_TOKEN_LIMIT`] per article.
    #[must_use]
    pub fn build_index(&self, articles: &[Arc<Article>]) -> SearchIndex {
        let mut index = SearchIndex::default();

        for article in articles.iter().filter(|a| !a.draft) {
            let slug = article.slug.clone();

            for token in tokenize(&article.title) {
                push_unique(index.title_index.entry(token).or_default(), &slug);
            }

            for token in tokenize(&article.content)
                .into_iter()
                .take(CONTENT_INDEX_TOKEN_LIMIT)
            {
                push_unique(index.content_index.entry(token).or_default(), &slug);
            }

            for tag in &article.tags {
                push_unique(
                    index.tag_index.entry(tag.to_lowercase()).or_default(),
                    &slug,
                );
            }

            index.articles.insert(slug, Arc::clone(article));
        }

        index
    }

    /// Indexed search: flat per-term weights over the inverted index.
    ///
    /// Faster than [`SearchService::search`] but coarser: exact token
    /// matches only, no occurrence counting, no description or category
    /// fields. The featured boost still applies.
    #[must_use]
    pub fn search_with_index(
        &self,
        index: &SearchIndex,
        query: &str,
        limit: usize,
    ) -> Vec<SearchResult> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scores: HashMap<&str, f64> = HashMap::new();
        let mut fields: HashMap<&str, Vec<MatchedField>> = HashMap::new();

        for term in &terms {
            if let Some(slugs) = index.title_index.get(term) {
                for slug in slugs {
                    *scores.entry(slug.as_str()).or_insert(0.0) += INDEX_TITLE_WEIGHT;
                    add_field(fields.entry(slug.as_str()).or_default(), MatchedField::Title);
                }
            }
            if let Some(slugs) = index.tag_index.get(term) {
                for slug in slugs {
                    *scores.entry(slug.as_str()).or_insert(0.0) += INDEX_TAG_WEIGHT;
                    add_field(fields.entry(slug.as_str()).or_default(), MatchedField::Tags);
                }
            }
            if let Some(slugs) = index.content_index.get(term) {
                for slug in slugs {
                    *scores.entry(slug.as_str()).or_insert(0.0) += INDEX_CONTENT_WEIGHT;
                    add_field(fields.entry(slug.as_str()).or_default(), MatchedField::Content);
                }
            }
        }

        let mut results: Vec<SearchResult> = scores
            .into_iter()
            .filter_map(|(slug, mut score)| {
                let article = index.articles.get(slug)?;
                if article.featured {
                    score *= FEATURED_BOOST;
                }
                Some(SearchResult {
                    article: Arc::clone(article),
                    score,
                    matched_fields: fields.get(slug).cloned().unwrap_or_default(),
                })
            })
            .collect();

        sort_and_truncate(&mut results, limit);
        results
    }
}

fn score_article(article: &Arc<Article>, terms: &[String]) -> Option<SearchResult> {
    let title = article.title.to_lowercase();
    let description = article.description.to_lowercase();
    let content = article.content.to_lowercase();

    let mut score = 0.0;
    let mut matched = Vec::new();

    for term in terms {
        if title.contains(term.as_str()) {
            score += TITLE_WEIGHT;
            add_field(&mut matched, MatchedField::Title);
        }
        if description.contains(term.as_str()) {
            score += DESCRIPTION_WEIGHT;
            add_field(&mut matched, MatchedField::Description);
        }
        if article.tags.iter().any(|t| t.eq_ignore_ascii_case(term)) {
            score += TAG_WEIGHT;
            add_field(&mut matched, MatchedField::Tags);
        }
        if article
            .categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(term))
        {
            score += TAG_WEIGHT;
            add_field(&mut matched, MatchedField::Categories);
        }
        let occurrences = content.matches(term.as_str()).count();
        if occurrences > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                score += CONTENT_WEIGHT * occurrences as f64;
            }
            add_field(&mut matched, MatchedField::Content);
        }
    }

    if score <= 0.0 {
        return None;
    }
    if article.featured {
        score *= FEATURED_BOOST;
    }

    Some(SearchResult {
        article: Arc::clone(article),
        score,
        matched_fields: matched,
    })
}

fn passes_filters(article: &Arc<Article>, filters: &SearchFilters) -> bool {
    if filters.only_published && article.draft {
        return false;
    }
    if filters.only_featured && !article.featured {
        return false;
    }
    if !filters.tags.is_empty() && !filters.tags.iter().any(|t| article.has_tag(t)) {
        return false;
    }
    if !filters.categories.is_empty()
        && !filters.categories.iter().any(|c| article.has_category(c))
    {
        return false;
    }
    if let Some(from) = filters.date_from.as_deref() {
        match parse_filter_date(from, false) {
            Some(bound) if article.date < bound => return false,
            Some(_) => {},
            None => warn!(value = from, "ignoring malformed date_from filter"),
        }
    }
    if let Some(to) = filters.date_to.as_deref() {
        match parse_filter_date(to, true) {
            Some(bound) if article.date > bound => return false,
            Some(_) => {},
            None => warn!(value = to, "ignoring malformed date_to filter"),
        }
    }
    true
}

/// Parse a `YYYY-MM-DD` filter bound; the upper bound extends to the end of
/// its day.
fn parse_filter_date(value: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(time.and_utc())
}

fn add_field(fields: &mut Vec<MatchedField>, field: MatchedField) {
    if !fields.contains(&field) {
        fields.push(field);
    }
}

fn push_unique(slugs: &mut Vec<String>, slug: &str) {
    if slugs.last().is_none_or(|last| last != slug) {
        slugs.push(slug.to_string());
    }
}

fn sort_and_truncate(results: &mut Vec<SearchResult>, limit: usize) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.article.slug.cmp(&b.article.slug))
    });
    if limit > 0 {
        results.truncate(limit);
    }
}
