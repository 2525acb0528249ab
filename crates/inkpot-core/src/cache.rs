//! Caching with TTL entries, LRU eviction, and typed namespaces.
//!
//! [`ArticleCache`] coordinates a single bounded store partitioned by key
//! prefix into four namespaces: `article:{slug}`, `search:{query}:{limit}`,
//! `content:{hash}`, and `stats`. Each namespace has its own TTL; the store
//! as a whole is bounded by `max_entries` with least-recently-used
//! eviction.
//!
//! ## Concurrency
//!
//! Reads take the read side of the lock; hit/miss counters and per-entry
//! recency stamps are atomics, so a read never needs lock promotion. A
//! lookup that finds a value of the wrong type for its namespace logs a
//! warning and reports a miss. It does not delete under the read lock;
//! the entry is replaced by the next write or ages out.
//!
//! A background task purges expired entries on a configured period and is
//! bound to a cancellation token: [`ArticleCache::shutdown`] cancels the
//! token, joins the task, and is safe to call repeatedly.

use crate::config::CacheSettings;
use crate::types::{Article, SearchResult, Stats};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A value stored in the cache; the variant encodes the owning namespace.
#[derive(Debug, Clone)]
enum CacheValue {
    Article(Arc<Article>),
    SearchResults(Vec<SearchResult>),
    Content(String),
    Stats(Stats),
}

impl CacheValue {
    const fn type_name(&self) -> &'static str {
        match self {
            Self::Article(_) => "article",
            Self::SearchResults(_) => "search_results",
            Self::Content(_) => "content",
            Self::Stats(_) => "stats",
        }
    }
}

struct StoredEntry {
    value: CacheValue,
    expires_at: Instant,
    /// Logical access clock stamp; updated atomically under the read lock.
    last_access: AtomicU64,
}

/// Shared hit/miss/eviction counters.
///
/// These are atomics on purpose: reads increment them while holding only
/// the read side of the store lock.
#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Observable cache statistics snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Lookups that returned a live value.
    pub hits: u64,
    /// Lookups that found nothing, an expired entry, or a type mismatch.
    pub misses: u64,
    /// `hits / (hits + misses)`, or 0 when no lookups happened.
    pub hit_rate: f64,
    /// Entries currently in the store, expired ones included.
    pub key_count: usize,
    /// Entries removed by LRU pressure or expiry cleanup.
    pub evictions: u64,
}

struct Store {
    entries: HashMap<String, StoredEntry>,
    max_entries: usize,
}

impl Store {
    fn evict_lru(&mut self) -> bool {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access.load(Ordering::Relaxed))
            .map(|(key, _)| key.clone());
        match victim {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    fn purge_expired(&mut self, now: Instant) -> u64 {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        (before - self.entries.len()) as u64
    }
}

/// TTL + LRU cache coordinator for the article engine.
pub struct ArticleCache {
    store: Arc<RwLock<Store>>,
    counters: Arc<Counters>,
    clock: AtomicU64,
    article_ttl: Duration,
    search_ttl: Duration,
    content_ttl: Duration,
    stop: CancellationToken,
    cleanup_task: Mutex<Option<JoinHandle<()>>>,
}

impl ArticleCache {
    /// Creates a cache from the given settings and, unless the cleanup
    /// period is zero, spawns the background expiry task.
    #[must_use]
    pub fn new(settings: &CacheSettings) -> Self {
        let store = Arc::new(RwLock::new(Store {
            entries: HashMap::new(),
            max_entries: settings.max_entries.max(1),
        }));
        let counters = Arc::new(Counters::default());
        let stop = CancellationToken::new();

        let cleanup_task = settings.cleanup_period().map(|period| {
            let store = Arc::clone(&store);
            let counters = Arc::clone(&counters);
            let stop = stop.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                loop {
                    tokio::select! {
                        () = stop.cancelled() => break,
                        _ = ticker.tick() => {
                            let removed = {
                                let mut guard = store.write().await;
                                guard.purge_expired(Instant::now())
                            };
                            if removed > 0 {
                                counters.evictions.fetch_add(removed, Ordering::Relaxed);
                                debug!(removed, "cache cleanup purged expired entries");
                            }
                        }
                    }
                }
                debug!("cache cleanup task stopped");
            })
        });

        Self {
            store,
            counters,
            clock: AtomicU64::new(0),
            article_ttl: settings.article_ttl(),
            search_ttl: settings.search_ttl(),
            content_ttl: settings.content_ttl(),
            stop,
            cleanup_task: Mutex::new(cleanup_task),
        }
    }

    async fn get_value(&self, key: &str) -> Option<CacheValue> {
        let guard = self.store.read().await;
        let Some(entry) = guard.entries.get(key) else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        if entry.expires_at <= Instant::now() {
            // Expired entries report a miss and are left for cleanup.
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        let stamp = self.clock.fetch_add(1, Ordering::Relaxed);
        entry.last_access.store(stamp, Ordering::Relaxed);
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.value.clone())
    }

    async fn set_value(&self, key: String, value: CacheValue, ttl: Duration) {
        let stamp = self.clock.fetch_add(1, Ordering::Relaxed);
        let entry = StoredEntry {
            value,
            expires_at: Instant::now() + ttl,
            last_access: AtomicU64::new(stamp),
        };
        let mut guard = self.store.write().await;
        guard.entries.insert(key, entry);
        while guard.entries.len() > guard.max_entries {
            if !guard.evict_lru() {
                break;
            }
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn type_mismatch(&self, key: &str, expected: &str, found: &CacheValue) {
        warn!(
            key,
            expected,
            found = found.type_name(),
            "cache entry has unexpected type; treating as miss"
        );
    }

    /// Fetch a cached article by slug.
    pub async fn get_article(&self, slug: &str) -> Option<Arc<Article>> {
        let key = format!("article:{slug}");
        match self.get_value(&key).await? {
            CacheValue::Article(article) => Some(article),
            other => {
                self.type_mismatch(&key, "article", &other);
                None
            },
        }
    }

    /// Cache an article under its slug.
    pub async fn set_article(&self, article: Arc<Article>) {
        let key = format!("article:{}", article.slug);
        self.set_value(key, CacheValue::Article(article), self.article_ttl)
            .await;
    }

    /// Drop the cached entry for a slug.
    pub async fn invalidate_article(&self, slug: &str) {
        let key = format!("article:{slug}");
        self.store.write().await.entries.remove(&key);
    }

    /// Fetch cached search results for a query/limit pair.
    pub async fn get_search_results(&self, query: &str, limit: usize) -> Option<Vec<SearchResult>> {
        let key = format!("search:{query}:{limit}");
        match self.get_value(&key).await? {
            CacheValue::SearchResults(results) => Some(results),
            other => {
                self.type_mismatch(&key, "search_results", &other);
                None
            },
        }
    }

    /// Cache search results for a query/limit pair.
    pub async fn set_search_results(&self, query: &str, limit: usize, results: Vec<SearchResult>) {
        let key = format!("search:{query}:{limit}");
        self.set_value(key, CacheValue::SearchResults(results), self.search_ttl)
            .await;
    }

    /// Fetch processed HTML by content hash.
    pub async fn get_processed_content(&self, hash: &str) -> Option<String> {
        let key = format!("content:{hash}");
        match self.get_value(&key).await? {
            CacheValue::Content(html) => Some(html),
            other => {
                self.type_mismatch(&key, "content", &other);
                None
            },
        }
    }

    /// Cache processed HTML under its content hash.
    pub async fn set_processed_content(&self, hash: &str, html: String) {
        let key = format!("content:{hash}");
        self.set_value(key, CacheValue::Content(html), self.content_ttl)
            .await;
    }

    /// Fetch the cached stats aggregate.
    pub async fn get_stats(&self) -> Option<Stats> {
        match self.get_value("stats").await? {
            CacheValue::Stats(stats) => Some(stats),
            other => {
                self.type_mismatch("stats", "stats", &other);
                None
            },
        }
    }

    /// Cache the stats aggregate. Stats share the article TTL.
    pub async fn set_stats(&self, stats: Stats) {
        self.set_value("stats".to_string(), CacheValue::Stats(stats), self.article_ttl)
            .await;
    }

    /// Clear every namespace.
    pub async fn invalidate_all(&self) {
        let mut guard = self.store.write().await;
        let dropped = guard.entries.len();
        guard.entries.clear();
        debug!(dropped, "cache fully invalidated");
    }

    /// Invalidate everything that may reference the given tag.
    ///
    /// The store has no prefix-range deletion, so this is a full clear: a
    /// deliberate coarseness trade-off that keeps tag invalidation correct
    /// at the cost of cold lookups afterwards.
    pub async fn invalidate_by_tag(&self, tag: &str) {
        debug!(tag, "tag invalidation requested; clearing cache");
        self.invalidate_all().await;
    }

    /// Invalidate all cached search results. Full clear, same trade-off as
    /// [`ArticleCache::invalidate_by_tag`].
    pub async fn invalidate_search_cache(&self) {
        debug!("search invalidation requested; clearing cache");
        self.invalidate_all().await;
    }

    /// Snapshot the hit/miss/eviction counters and key count.
    pub async fn get_cache_stats(&self) -> CacheStats {
        let key_count = self.store.read().await.entries.len();
        let hits = self.counters.hits.load(Ordering::Relaxed);
        let misses = self.counters.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        #[allow(clippy::cast_precision_loss)]
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            key_count,
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }

    /// Whether the cache is accepting operations (not shut down).
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        !self.stop.is_cancelled()
    }

    /// Stop the background cleanup task and mark the cache unhealthy.
    ///
    /// Idempotent: repeated calls observe the already-cancelled token and
    /// the already-taken join handle and return immediately.
    pub async fn shutdown(&self) {
        self.stop.cancel();
        let handle = self.cleanup_task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "cache cleanup task join failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleType;
    use chrono::Utc;

    fn settings() -> CacheSettings {
        CacheSettings {
            enabled: true,
            max_entries: 100,
            article_ttl_secs: 60,
            search_ttl_secs: 60,
            content_ttl_secs: 60,
            cleanup_period_secs: 0,
        }
    }

    fn article(slug: &str) -> Arc<Article> {
        Arc::new(Article {
            slug: slug.into(),
            title: slug.to_uppercase(),
            description: String::new(),
            content: "body".into(),
            excerpt: String::new(),
            date: Utc::now(),
            tags: vec![],
            categories: vec![],
            author: String::new(),
            draft: false,
            featured: false,
            article_type: ArticleType::Article,
            word_count: 1,
            reading_time: 1,
            last_modified: Utc::now(),
        })
    }

    #[tokio::test]
    async fn article_round_trip() {
        let cache = ArticleCache::new(&settings());
        cache.set_article(article("hello")).await;
        let cached = cache.get_article("hello").await.unwrap();
        assert_eq!(cached.slug, "hello");
        assert!(cache.get_article("missing").await.is_none());
    }

    #[tokio::test]
    async fn hit_and_miss_accounting() {
        let cache = ArticleCache::new(&settings());
        cache.set_article(article("a")).await;

        cache.get_article("a").await; // hit
        cache.get_article("a").await; // hit
        cache.get_article("b").await; // miss

        let stats = cache.get_cache_stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(stats.key_count, 1);
    }

    #[tokio::test]
    async fn empty_cache_has_zero_hit_rate() {
        let cache = ArticleCache::new(&settings());
        let stats = cache.get_cache_stats().await;
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[tokio::test]
    async fn lru_eviction_respects_bound() {
        let mut s = settings();
        s.max_entries = 2;
        let cache = ArticleCache::new(&s);

        cache.set_article(article("a")).await;
        cache.set_article(article("b")).await;
        // Touch "a" so "b" becomes the LRU victim.
        cache.get_article("a").await;
        cache.set_article(article("c")).await;

        assert!(cache.get_article("a").await.is_some());
        assert!(cache.get_article("b").await.is_none());
        assert!(cache.get_article("c").await.is_some());
        assert_eq!(cache.get_cache_stats().await.evictions, 1);
    }

    #[tokio::test]
    async fn expired_entries_read_as_misses() {
        let mut s = settings();
        s.article_ttl_secs = 0;
        let cache = ArticleCache::new(&s);
        cache.set_article(article("a")).await;
        assert!(cache.get_article("a").await.is_none());
        assert_eq!(cache.get_cache_stats().await.misses, 1);
    }

    #[tokio::test]
    async fn background_cleanup_purges_expired() {
        let mut s = settings();
        s.article_ttl_secs = 0;
        s.cleanup_period_secs = 1;
        let cache = ArticleCache::new(&s);
        cache.set_article(article("a")).await;

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let stats = cache.get_cache_stats().await;
        assert_eq!(stats.key_count, 0);
        assert!(stats.evictions >= 1);

        cache.shutdown().await;
    }

    #[tokio::test]
    async fn type_mismatch_is_a_miss() {
        let cache = ArticleCache::new(&settings());
        // Write a content value, then read it through the article namespace.
        cache
            .set_value(
                "article:x".to_string(),
                CacheValue::Content("<p>html</p>".into()),
                Duration::from_secs(60),
            )
            .await;
        assert!(cache.get_article("x").await.is_none());
        // The entry is still there: no delete under the read path.
        assert_eq!(cache.get_cache_stats().await.key_count, 1);
    }

    #[tokio::test]
    async fn invalidation_clears_namespaces() {
        let cache = ArticleCache::new(&settings());
        cache.set_article(article("a")).await;
        cache.set_search_results("go", 10, vec![]).await;
        cache.set_processed_content("abc", "<p>x</p>".into()).await;

        cache.invalidate_by_tag("go").await;
        assert_eq!(cache.get_cache_stats().await.key_count, 0);
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut s = settings();
        s.cleanup_period_secs = 1;
        let cache = ArticleCache::new(&s);
        assert!(cache.is_healthy());
        cache.shutdown().await;
        assert!(!cache.is_healthy());
        // Second shutdown must not hang or panic.
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn search_and_content_round_trips() {
        let cache = ArticleCache::new(&settings());
        cache.set_search_results("query", 5, vec![]).await;
        assert_eq!(cache.get_search_results("query", 5).await, Some(vec![]));
        // Different limit is a different key.
        assert!(cache.get_search_results("query", 10).await.is_none());

        cache.set_processed_content("hash", "<p>ok</p>".into()).await;
        assert_eq!(
            cache.get_processed_content("hash").await.as_deref(),
            Some("<p>ok</p>")
        );
    }
}
