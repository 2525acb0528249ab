//! Caching decorator over an [`ArticleRepository`].
//!
//! Transparent wrapper: per-slug lookups and the stats aggregate consult
//! the cache before delegating; loads and mutations invalidate. The list
//! accessors delegate uncached since they assemble slices of `Arc`s from
//! state that is already in memory, so caching them buys nothing.

use crate::cache::ArticleCache;
use crate::repository::ArticleRepository;
use crate::types::{Article, Stats};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Repository decorator backed by an [`ArticleCache`].
pub struct CachedRepository<R: ArticleRepository> {
    inner: R,
    cache: Arc<ArticleCache>,
}

impl<R: ArticleRepository> CachedRepository<R> {
    /// Wrap `inner`, consulting `cache` for slug and stats reads.
    pub const fn new(inner: R, cache: Arc<ArticleCache>) -> Self {
        Self { inner, cache }
    }

    /// The cache this decorator consults.
    #[must_use]
    pub fn cache(&self) -> &Arc<ArticleCache> {
        &self.cache
    }
}

#[async_trait]
impl<R: ArticleRepository> ArticleRepository for CachedRepository<R> {
    async fn load_all(&self, cancel: &CancellationToken) -> Result<Vec<Arc<Article>>> {
        let loaded = self.inner.load_all(cancel).await?;
        self.cache.invalidate_all().await;
        Ok(loaded)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Arc<Article>> {
        if let Some(article) = self.cache.get_article(slug).await {
            // Only published articles are cached, but a stale entry from
            // before a draft toggle must not leak through.
            if !article.draft {
                return Ok(article);
            }
            return Err(Error::NotFound(slug.to_string()));
        }

        let article = self.inner.get_by_slug(slug).await?;
        self.cache.set_article(Arc::clone(&article)).await;
        Ok(article)
    }

    async fn get_draft_by_slug(&self, slug: &str) -> Result<Arc<Article>> {
        self.inner.get_draft_by_slug(slug).await
    }

    async fn get_published(&self) -> Vec<Arc<Article>> {
        self.inner.get_published().await
    }

    async fn get_drafts(&self) -> Vec<Arc<Article>> {
        self.inner.get_drafts().await
    }

    async fn get_by_tag(&self, tag: &str) -> Vec<Arc<Article>> {
        self.inner.get_by_tag(tag).await
    }

    async fn get_by_category(&self, category: &str) -> Vec<Arc<Article>> {
        self.inner.get_by_category(category).await
    }

    async fn get_recent(&self, n: usize) -> Vec<Arc<Article>> {
        self.inner.get_recent(n).await
    }

    async fn get_featured(&self) -> Vec<Arc<Article>> {
        self.inner.get_featured().await
    }

    async fn get_stats(&self) -> Stats {
        if let Some(stats) = self.cache.get_stats().await {
            return stats;
        }
        let stats = self.inner.get_stats().await;
        self.cache.set_stats(stats.clone()).await;
        stats
    }

    async fn get_last_modified(&self) -> DateTime<Utc> {
        self.inner.get_last_modified().await
    }

    async fn reload(&self, cancel: &CancellationToken) -> Result<()> {
        self.inner.reload(cancel).await?;
        self.cache.invalidate_all().await;
        Ok(())
    }

    async fn update_draft_status(&self, slug: &str, draft: bool) -> Result<()> {
        self.inner.update_draft_status(slug, draft).await?;
        // Lists, tags, categories, and stats are all affected; clear
        // everything rather than chase dependent keys.
        self.cache.invalidate_all().await;
        Ok(())
    }
}
