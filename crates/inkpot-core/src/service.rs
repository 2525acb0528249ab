//! Composite article service: the single public contract of the engine.
//!
//! [`CompositeService`] owns the repository (optionally wrapped in the
//! caching decorator), the content processor, the search service, and the
//! search index. Startup loads the corpus, pre-renders content into the
//! cache, and builds the index; queries then delegate to the fast indexed
//! path with a direct-scan fallback.
//!
//! Every public read path enforces draft invisibility; the draft surface
//! (`get_draft_articles`, `get_draft_by_slug`, `preview_draft`) is
//! deliberately separate.

use crate::cache::{ArticleCache, CacheStats};
use crate::cached_repository::CachedRepository;
use crate::config::Config;
use crate::processor::ContentProcessor;
use crate::repository::{ArticleRepository, FileRepository};
use crate::search::SearchService;
use crate::types::{Article, SearchFilters, SearchIndex, SearchResult, Stats};
use crate::{Error, Result, slug};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The public contract consumed by the HTTP layer, CLI front-ends, and
/// feed generators.
#[async_trait]
pub trait ArticleService: Send + Sync {
    /// The published view, date descending.
    async fn get_all_articles(&self) -> Result<Vec<Arc<Article>>>;
    /// A published article by slug.
    async fn get_article_by_slug(&self, slug: &str) -> Result<Arc<Article>>;
    /// Published articles carrying the tag.
    async fn get_articles_by_tag(&self, tag: &str) -> Result<Vec<Arc<Article>>>;
    /// Published articles in the category.
    async fn get_articles_by_category(&self, category: &str) -> Result<Vec<Arc<Article>>>;
    /// The feed view: published articles, newest first, truncated to
    /// `limit` when it is nonzero.
    async fn get_articles_for_feed(&self, limit: usize) -> Result<Vec<Arc<Article>>>;
    /// Published articles flagged as featured.
    async fn get_featured_articles(&self) -> Result<Vec<Arc<Article>>>;
    /// The `limit` newest published articles.
    async fn get_recent_articles(&self, limit: usize) -> Result<Vec<Arc<Article>>>;
    /// All drafts.
    async fn get_draft_articles(&self) -> Result<Vec<Arc<Article>>>;
    /// A draft article by slug.
    async fn get_draft_by_slug(&self, slug: &str) -> Result<Arc<Article>>;
    /// Rendered HTML for an article (published or draft), served from the
    /// processed-content cache when possible.
    async fn get_processed_content(&self, slug: &str) -> Result<String>;
    /// Sorted distinct tags across published articles.
    async fn get_all_tags(&self) -> Result<Vec<String>>;
    /// Sorted distinct categories across published articles.
    async fn get_all_categories(&self) -> Result<Vec<String>>;
    /// Tag → published-article count.
    async fn get_tag_counts(&self) -> Result<HashMap<String, usize>>;
    /// Category → published-article count.
    async fn get_category_counts(&self) -> Result<HashMap<String, usize>>;
    /// The derived corpus aggregate.
    async fn get_stats(&self) -> Result<Stats>;
    /// Re-scan the articles directory and rebuild every derived structure.
    async fn reload_articles(&self) -> Result<()>;
    /// Ranked full-text search.
    async fn search_articles(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
    /// Ranked title-only search.
    async fn search_in_title(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
    /// Ranked search over the subset passing `filters`.
    async fn search_with_filters(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>>;
    /// Completion suggestions for a query prefix.
    async fn get_search_suggestions(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
    /// An article by slug regardless of draft status, for preview surfaces.
    async fn preview_draft(&self, slug: &str) -> Result<Arc<Article>>;
    /// Clear an article's draft flag. Errors if it is already published.
    async fn publish_draft(&self, slug: &str) -> Result<()>;
    /// Set an article's draft flag. Errors if it is already a draft.
    async fn unpublish_article(&self, slug: &str) -> Result<()>;
}

/// Orchestrator implementing [`ArticleService`].
pub struct CompositeService {
    repository: Arc<dyn ArticleRepository>,
    cache: Option<Arc<ArticleCache>>,
    processor: ContentProcessor,
    search: SearchService,
    index: RwLock<Option<SearchIndex>>,
    started: AtomicBool,
    cancel: CancellationToken,
}

impl CompositeService {
    /// Assemble the service from configuration. Nothing touches disk until
    /// [`CompositeService::start`] runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the configuration is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let processor = ContentProcessor::new();
        let file_repository = FileRepository::new(&config.articles_path, processor.clone());

        let (repository, cache): (Arc<dyn ArticleRepository>, Option<Arc<ArticleCache>>) =
            if config.cache.enabled {
                let cache = Arc::new(ArticleCache::new(&config.cache));
                (
                    Arc::new(CachedRepository::new(file_repository, Arc::clone(&cache))),
                    Some(cache),
                )
            } else {
                (Arc::new(file_repository), None)
            };

        Ok(Self {
            repository,
            cache,
            processor,
            search: SearchService::new(),
            index: RwLock::new(None),
            started: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        })
    }

    /// Load the corpus, pre-render content, and build the search index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] on a second start, or whatever the
    /// initial load surfaces. A failed start leaves the service stopped.
    pub async fn start(&self) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::Validation("service already started".into()));
        }

        match self.initialize().await {
            Ok(()) => {
                info!("article service started");
                Ok(())
            },
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                Err(e)
            },
        }
    }

    /// Stop the service: cancel in-flight work and shut the cache down.
    /// A second stop is a no-op.
    pub async fn stop(&self) {
        if !self.started.swap(false, Ordering::SeqCst) {
            return;
        }
        self.cancel.cancel();
        if let Some(cache) = &self.cache {
            cache.shutdown().await;
        }
        info!("article service stopped");
    }

    /// Cache statistics, when caching is enabled.
    pub async fn cache_stats(&self) -> Option<CacheStats> {
        match &self.cache {
            Some(cache) => Some(cache.get_cache_stats().await),
            None => None,
        }
    }

    /// Whether the service is started and its cache (if any) is healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.started.load(Ordering::SeqCst)
            && self.cache.as_ref().is_none_or(|cache| cache.is_healthy())
    }

    async fn initialize(&self) -> Result<()> {
        let loaded = self.repository.load_all(&self.cancel).await?;
        self.warm_content_cache(&loaded).await;
        self.rebuild_index().await;
        Ok(())
    }

    fn ensure_started(&self) -> Result<()> {
        if self.started.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::NotStarted)
        }
    }

    /// Pre-render published articles into the processed-content namespace
    /// so first reads are warm. Render failures are logged and skipped;
    /// the lazy path retries on access.
    async fn warm_content_cache(&self, articles: &[Arc<Article>]) {
        let Some(cache) = &self.cache else { return };
        for article in articles.iter().filter(|a| !a.draft) {
            match self.render_article(article) {
                Ok(html) => {
                    let hash = self.processor.content_hash(&article.content);
                    cache.set_processed_content(&hash, html).await;
                },
                Err(e) => {
                    warn!(slug = %article.slug, error = %e, "failed to pre-render article");
                },
            }
        }
        debug!(count = articles.len(), "content cache warmed");
    }

    fn render_article(&self, article: &Article) -> Result<String> {
        let html = self.processor.process_markdown(&article.content)?;
        Ok(self.processor.process_duplicate_titles(&article.title, &html))
    }

    async fn rebuild_index(&self) {
        let published = self.repository.get_published().await;
        let new_index = self.search.build_index(&published);
        debug!(
            articles = published.len(),
            terms = new_index.term_count(),
            "search index rebuilt"
        );
        *self.index.write().await = Some(new_index);
    }

    /// Look up an article regardless of draft status.
    async fn get_any_by_slug(&self, slug_value: &str) -> Result<Arc<Article>> {
        match self.repository.get_by_slug(slug_value).await {
            Ok(article) => Ok(article),
            Err(Error::NotFound(_)) => self.repository.get_draft_by_slug(slug_value).await,
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ArticleService for CompositeService {
    async fn get_all_articles(&self) -> Result<Vec<Arc<Article>>> {
        self.ensure_started()?;
        Ok(self.repository.get_published().await)
    }

    async fn get_article_by_slug(&self, slug_value: &str) -> Result<Arc<Article>> {
        self.ensure_started()?;
        slug::validate_slug(slug_value)?;
        self.repository.get_by_slug(slug_value).await
    }

    async fn get_articles_by_tag(&self, tag: &str) -> Result<Vec<Arc<Article>>> {
        self.ensure_started()?;
        Ok(self.repository.get_by_tag(tag).await)
    }

    async fn get_articles_by_category(&self, category: &str) -> Result<Vec<Arc<Article>>> {
        self.ensure_started()?;
        Ok(self.repository.get_by_category(category).await)
    }

    async fn get_articles_for_feed(&self, limit: usize) -> Result<Vec<Arc<Article>>> {
        self.ensure_started()?;
        let mut articles = self.repository.get_published().await;
        if limit > 0 {
            articles.truncate(limit);
        }
        Ok(articles)
    }

    async fn get_featured_articles(&self) -> Result<Vec<Arc<Article>>> {
        self.ensure_started()?;
        Ok(self.repository.get_featured().await)
    }

    async fn get_recent_articles(&self, limit: usize) -> Result<Vec<Arc<Article>>> {
        self.ensure_started()?;
        Ok(self.repository.get_recent(limit).await)
    }

    async fn get_draft_articles(&self) -> Result<Vec<Arc<Article>>> {
        self.ensure_started()?;
        Ok(self.repository.get_drafts().await)
    }

    async fn get_draft_by_slug(&self, slug_value: &str) -> Result<Arc<Article>> {
        self.ensure_started()?;
        slug::validate_slug(slug_value)?;
        self.repository.get_draft_by_slug(slug_value).await
    }

    async fn get_processed_content(&self, slug_value: &str) -> Result<String> {
        self.ensure_started()?;
        slug::validate_slug(slug_value)?;
        let article = self.get_any_by_slug(slug_value).await?;

        let hash = self.processor.content_hash(&article.content);
        if let Some(cache) = &self.cache {
            if let Some(html) = cache.get_processed_content(&hash).await {
                return Ok(html);
            }
        }

        let html = self.render_article(&article)?;
        if let Some(cache) = &self.cache {
            cache.set_processed_content(&hash, html.clone()).await;
        }
        Ok(html)
    }

    async fn get_all_tags(&self) -> Result<Vec<String>> {
        self.ensure_started()?;
        let published = self.repository.get_published().await;
        let tags: BTreeSet<String> = published
            .iter()
            .flat_map(|a| a.tags.iter().map(|t| t.to_lowercase()))
            .collect();
        Ok(tags.into_iter().collect())
    }

    async fn get_all_categories(&self) -> Result<Vec<String>> {
        self.ensure_started()?;
        let published = self.repository.get_published().await;
        let categories: BTreeSet<String> = published
            .iter()
            .flat_map(|a| a.categories.iter().map(|c| c.to_lowercase()))
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn get_tag_counts(&self) -> Result<HashMap<String, usize>> {
        self.ensure_started()?;
        let published = self.repository.get_published().await;
        let mut counts = HashMap::new();
        for article in &published {
            for tag in &article.tags {
                *counts.entry(tag.to_lowercase()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn get_category_counts(&self) -> Result<HashMap<String, usize>> {
        self.ensure_started()?;
        let published = self.repository.get_published().await;
        let mut counts = HashMap::new();
        for article in &published {
            for category in &article.categories {
                *counts.entry(category.to_lowercase()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn get_stats(&self) -> Result<Stats> {
        self.ensure_started()?;
        Ok(self.repository.get_stats().await)
    }

    async fn reload_articles(&self) -> Result<()> {
        self.ensure_started()?;
        self.repository.reload(&self.cancel).await?;
        // Everything cached before the reload is stale; clear it before
        // re-warming from the new corpus.
        if let Some(cache) = &self.cache {
            cache.invalidate_all().await;
        }
        let loaded = self.repository.get_published().await;
        self.warm_content_cache(&loaded).await;
        self.rebuild_index().await;
        info!(count = loaded.len(), "articles reloaded");
        Ok(())
    }

    async fn search_articles(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.ensure_started()?;

        if let Some(cache) = &self.cache {
            if let Some(results) = cache.get_search_results(query, limit).await {
                return Ok(results);
            }
        }

        let results = {
            let index_guard = self.index.read().await;
            match index_guard.as_ref() {
                Some(index) => self.search.search_with_index(index, query, limit),
                None => {
                    let published = self.repository.get_published().await;
                    self.search.search(&published, query, limit)
                },
            }
        };

        if let Some(cache) = &self.cache {
            cache.set_search_results(query, limit, results.clone()).await;
        }
        Ok(results)
    }

    async fn search_in_title(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.ensure_started()?;
        let published = self.repository.get_published().await;
        Ok(self.search.search_in_title(&published, query, limit))
    }

    async fn search_with_filters(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        self.ensure_started()?;
        let published = self.repository.get_published().await;
        Ok(self.search.search_with_filters(&published, query, filters))
    }

    async fn get_search_suggestions(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        self.ensure_started()?;
        let published = self.repository.get_published().await;
        Ok(self.search.get_suggestions(&published, prefix, limit))
    }

    async fn preview_draft(&self, slug_value: &str) -> Result<Arc<Article>> {
        self.ensure_started()?;
        slug::validate_slug(slug_value)?;
        self.get_any_by_slug(slug_value).await
    }

    async fn publish_draft(&self, slug_value: &str) -> Result<()> {
        self.ensure_started()?;
        slug::validate_slug(slug_value)?;

        if self.repository.get_draft_by_slug(slug_value).await.is_err() {
            return if self.repository.get_by_slug(slug_value).await.is_ok() {
                Err(Error::Validation(format!(
                    "article '{slug_value}' is already published"
                )))
            } else {
                Err(Error::NotFound(slug_value.to_string()))
            };
        }

        self.repository.update_draft_status(slug_value, false).await?;
        // The published set changed; derived structures must follow.
        self.rebuild_index().await;
        Ok(())
    }

    async fn unpublish_article(&self, slug_value: &str) -> Result<()> {
        self.ensure_started()?;
        slug::validate_slug(slug_value)?;

        if self.repository.get_by_slug(slug_value).await.is_err() {
            return if self.repository.get_draft_by_slug(slug_value).await.is_ok() {
                Err(Error::Validation(format!(
                    "article '{slug_value}' is already a draft"
                )))
            } else {
                Err(Error::NotFound(slug_value.to_string()))
            };
        }

        self.repository.update_draft_status(slug_value, true).await?;
        self.rebuild_index().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir, slug: &str, draft: bool) {
        let content = format!(
            "---\ntitle: \"Title {slug}\"\nslug: \"{slug}\"\ndate: 2025-01-01\ndraft: {draft}\n---\n\nbody text here\n"
        );
        fs::write(dir.path().join(format!("{slug}.md")), content).unwrap();
    }

    fn service_for(dir: &TempDir) -> CompositeService {
        CompositeService::new(&Config::new(dir.path())).unwrap()
    }

    #[tokio::test]
    async fn queries_before_start_are_rejected() {
        let dir = TempDir::new().unwrap();
        let service = service_for(&dir);
        assert!(matches!(
            service.get_all_articles().await,
            Err(Error::NotStarted)
        ));
        assert!(matches!(
            service.search_articles("x", 10).await,
            Err(Error::NotStarted)
        ));
    }

    #[tokio::test]
    async fn double_start_errors_double_stop_does_not() {
        let dir = TempDir::new().unwrap();
        write_sample(&dir, "a", false);
        let service = service_for(&dir);

        service.start().await.unwrap();
        assert!(matches!(service.start().await, Err(Error::Validation(_))));

        service.stop().await;
        service.stop().await; // no-op
        assert!(matches!(
            service.get_all_articles().await,
            Err(Error::NotStarted)
        ));
    }

    #[tokio::test]
    async fn failed_start_leaves_service_stopped() {
        let config = Config::new("/nonexistent/inkpot-service-test");
        let service = CompositeService::new(&config).unwrap();
        assert!(service.start().await.is_err());
        assert!(!service.is_healthy());
        // A retry is allowed after a failed start.
        assert!(service.start().await.is_err());
    }

    #[tokio::test]
    async fn invalid_slug_is_rejected_at_the_contract() {
        let dir = TempDir::new().unwrap();
        write_sample(&dir, "a", false);
        let service = service_for(&dir);
        service.start().await.unwrap();

        assert!(matches!(
            service.get_article_by_slug("Bad Slug!").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            service.get_article_by_slug("-x-").await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn publish_wrappers_enforce_state_transitions() {
        let dir = TempDir::new().unwrap();
        write_sample(&dir, "pub", false);
        write_sample(&dir, "drf", true);
        let service = service_for(&dir);
        service.start().await.unwrap();

        // Publishing a published article is refused.
        assert!(matches!(
            service.publish_draft("pub").await,
            Err(Error::Validation(_))
        ));
        // Unpublishing a draft is refused.
        assert!(matches!(
            service.unpublish_article("drf").await,
            Err(Error::Validation(_))
        ));
        // Unknown slugs are NotFound.
        assert!(matches!(
            service.publish_draft("ghost").await,
            Err(Error::NotFound(_))
        ));

        service.stop().await;
    }

    #[tokio::test]
    async fn metadata_accessors_fold_case() {
        let dir = TempDir::new().unwrap();
        let content = "---\ntitle: T\nslug: a\ndate: 2025-01-01\ntags: [Go, go, Rust]\ncategories: [Tech]\n---\n\nbody\n";
        fs::write(dir.path().join("a.md"), content).unwrap();
        let service = service_for(&dir);
        service.start().await.unwrap();

        assert_eq!(service.get_all_tags().await.unwrap(), vec!["go", "rust"]);
        assert_eq!(service.get_all_categories().await.unwrap(), vec!["tech"]);
        let counts = service.get_tag_counts().await.unwrap();
        assert_eq!(counts.get("go"), Some(&2));

        service.stop().await;
    }

    #[tokio::test]
    async fn processed_content_is_rendered_and_cached() {
        let dir = TempDir::new().unwrap();
        write_sample(&dir, "a", false);
        let service = service_for(&dir);
        service.start().await.unwrap();

        let html = service.get_processed_content("a").await.unwrap();
        assert!(html.contains("<p>body text here</p>"));
        // Second read must be served from the cache.
        let stats_before = service.cache_stats().await.unwrap();
        service.get_processed_content("a").await.unwrap();
        let stats_after = service.cache_stats().await.unwrap();
        assert!(stats_after.hits > stats_before.hits);

        service.stop().await;
    }
}
