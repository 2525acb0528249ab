//! Article repository: directory scanning, parsing, and atomic mutation.
//!
//! [`FileRepository`] owns the in-memory article set loaded from the
//! configured directory. A reader-writer lock protects the sorted article
//! list, the slug map, and the reload timestamp; accessors hand out
//! defensive copies. Loading is a total replacement: the working set is
//! built off-lock and swapped in whole, so concurrent readers observe
//! either the old corpus or the new one, never a mix.
//!
//! Per-file failures (missing delimiters, bad YAML, unreadable files,
//! colliding slugs) are logged at WARN and the file is treated as absent;
//! only a directory walk error aborts a load.

use crate::frontmatter::{self, Document};
use crate::processor::{ContentProcessor, infer_article_type};
use crate::types::{Article, Stats, TagCount};
use crate::{Error, Result, slug};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// File extensions treated as articles, in the probe order used by the
/// draft toggle.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd"];

/// Excerpt length cap applied at load time.
const EXCERPT_MAX_LEN: usize = 200;

/// The repository contract shared by the filesystem implementation and the
/// caching decorator.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Scan the articles directory and replace the in-memory set.
    ///
    /// Checks `cancel` between file reads and returns [`Error::Canceled`]
    /// when it fires.
    async fn load_all(&self, cancel: &CancellationToken) -> Result<Vec<Arc<Article>>>;

    /// Fetch a published article by slug.
    async fn get_by_slug(&self, slug: &str) -> Result<Arc<Article>>;

    /// Fetch a draft article by slug.
    async fn get_draft_by_slug(&self, slug: &str) -> Result<Arc<Article>>;

    /// The published view: non-drafts, date descending then slug ascending.
    async fn get_published(&self) -> Vec<Arc<Article>>;

    /// All drafts, same ordering.
    async fn get_drafts(&self) -> Vec<Arc<Article>>;

    /// Published articles carrying the tag (case-insensitive).
    async fn get_by_tag(&self, tag: &str) -> Vec<Arc<Article>>;

    /// Published articles in the category (case-insensitive).
    async fn get_by_category(&self, category: &str) -> Vec<Arc<Article>>;

    /// The first `n` of the published view.
    async fn get_recent(&self, n: usize) -> Vec<Arc<Article>>;

    /// Published articles flagged as featured.
    async fn get_featured(&self) -> Vec<Arc<Article>>;

    /// Derived corpus aggregate.
    async fn get_stats(&self) -> Stats;

    /// When the repository last completed a load.
    async fn get_last_modified(&self) -> DateTime<Utc>;

    /// Re-scan the directory, replacing the article set wholesale.
    async fn reload(&self, cancel: &CancellationToken) -> Result<()>;

    /// Toggle an article's draft flag, rewriting its file atomically.
    ///
    /// Only after the on-disk rename succeeds is the in-memory flag
    /// updated, so disk and memory stay consistent on failure.
    async fn update_draft_status(&self, slug: &str, draft: bool) -> Result<()>;
}

struct RepoState {
    /// Sorted by date descending, slug ascending.
    articles: Vec<Arc<Article>>,
    by_slug: HashMap<String, Arc<Article>>,
    last_reload: DateTime<Utc>,
}

/// Filesystem-backed article repository.
pub struct FileRepository {
    articles_path: PathBuf,
    processor: ContentProcessor,
    state: RwLock<RepoState>,
}

impl FileRepository {
    /// Creates an empty repository rooted at `articles_path`. Nothing is
    /// read from disk until [`ArticleRepository::load_all`] runs.
    #[must_use]
    pub fn new(articles_path: impl Into<PathBuf>, processor: ContentProcessor) -> Self {
        Self {
            articles_path: articles_path.into(),
            processor,
            state: RwLock::new(RepoState {
                articles: Vec::new(),
                by_slug: HashMap::new(),
                last_reload: Utc::now(),
            }),
        }
    }

    fn build_article(&self, path: &Path, document: Document, mtime: DateTime<Utc>) -> Article {
        let Document {
            frontmatter: fm,
            raw: _,
            body,
        } = document;

        let word_count = body.split_whitespace().count();
        let reading_time = self.processor.calculate_reading_time(&body);
        let excerpt = self.processor.generate_excerpt(&body, EXCERPT_MAX_LEN);

        let date = fm
            .date
            .as_deref()
            .and_then(frontmatter::parse_date)
            .unwrap_or(mtime);

        let article_slug = match fm.slug.as_deref().map(str::trim) {
            Some(explicit) if !explicit.is_empty() => explicit.to_string(),
            _ => {
                let generated = slug::slugify(&fm.title);
                if generated.is_empty() {
                    format!("thought-{}", Utc::now().timestamp())
                } else {
                    generated
                }
            },
        };

        let article_type = infer_article_type(&fm, word_count);
        debug!(slug = %article_slug, path = %path.display(), "loaded article");

        Article {
            slug: article_slug,
            title: fm.title,
            description: fm.description,
            content: body,
            excerpt,
            date,
            tags: fm.tags,
            categories: fm.categories,
            author: fm.author,
            draft: fm.draft,
            featured: fm.featured,
            article_type,
            word_count,
            reading_time,
            last_modified: mtime,
        }
    }

    /// Resolve the on-disk file for a slug by probing each supported
    /// extension in order.
    fn resolve_article_path(&self, slug: &str) -> Option<PathBuf> {
        SUPPORTED_EXTENSIONS.iter().find_map(|ext| {
            let candidate = self.articles_path.join(format!("{slug}.{ext}"));
            candidate.is_file().then_some(candidate)
        })
    }
}

fn is_article_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Recursively collect article files under `dir`.
async fn collect_article_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let file_type = entry.file_type().await?;
        if file_type.is_dir() {
            Box::pin(collect_article_files(&path, files)).await?;
        } else if file_type.is_file() && is_article_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Rewrite `path` through the backup/tmp/rename protocol.
///
/// Stable state only ever contains `path` itself; `.tmp` and `.backup`
/// exist transiently during the swap. A failure after staging removes the
/// tmp file and leaves the original untouched.
async fn atomic_rewrite(path: &Path, new_content: &str, original: &[u8]) -> Result<()> {
    let backup_path = backup_file_path(path);
    if let Err(e) = tokio::fs::write(&backup_path, original).await {
        warn!(path = %backup_path.display(), error = %e, "failed to write backup; continuing");
    }

    let tmp_path = tmp_file_path(path);
    if let Err(e) = tokio::fs::write(&tmp_path, new_content).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await
        {
            warn!(path = %tmp_path.display(), error = %e, "failed to restrict tmp permissions");
        }
    }

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    if let Err(e) = tokio::fs::remove_file(&backup_path).await {
        warn!(path = %backup_path.display(), error = %e, "failed to remove backup after commit");
    }
    Ok(())
}

fn tmp_file_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

fn backup_file_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".backup");
    PathBuf::from(os)
}

fn sort_articles(articles: &mut [Arc<Article>]) {
    articles.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

fn compute_stats(articles: &[Arc<Article>]) -> Stats {
    let total_articles = articles.len();
    let published: Vec<&Arc<Article>> = articles.iter().filter(|a| !a.draft).collect();
    let published_count = published.len();
    let draft_count = total_articles - published_count;

    let mut tag_counts: HashMap<String, usize> = HashMap::new();
    let mut category_set: std::collections::HashSet<String> = std::collections::HashSet::new();
    for article in &published {
        for tag in &article.tags {
            *tag_counts.entry(tag.to_lowercase()).or_insert(0) += 1;
        }
        for category in &article.categories {
            category_set.insert(category.to_lowercase());
        }
    }

    let mut top_tags: Vec<TagCount> = tag_counts
        .iter()
        .map(|(tag, count)| TagCount {
            tag: tag.clone(),
            count: *count,
        })
        .collect();
    top_tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    top_tags.truncate(10);

    let recent_articles: Vec<Arc<Article>> = published.iter().take(5).map(|a| Arc::clone(a)).collect();

    Stats {
        total_articles,
        published_count,
        draft_count,
        tag_count: tag_counts.len(),
        category_count: category_set.len(),
        top_tags,
        recent_articles,
    }
}

#[async_trait]
impl ArticleRepository for FileRepository {
    async fn load_all(&self, cancel: &CancellationToken) -> Result<Vec<Arc<Article>>> {
        let mut files = Vec::new();
        collect_article_files(&self.articles_path, &mut files).await?;
        // Deterministic walk order so slug collisions resolve stably.
        files.sort();

        let mut working: Vec<Arc<Article>> = Vec::with_capacity(files.len());
        let mut by_slug: HashMap<String, Arc<Article>> = HashMap::with_capacity(files.len());

        for path in files {
            if cancel.is_cancelled() {
                return Err(Error::Canceled);
            }

            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                },
            };

            let document = match frontmatter::parse_document(&content) {
                Ok(document) => document,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unparseable file");
                    continue;
                },
            };

            let mtime = tokio::fs::metadata(&path)
                .await
                .and_then(|m| m.modified())
                .map_or_else(|_| Utc::now(), DateTime::<Utc>::from);

            let article = Arc::new(self.build_article(&path, document, mtime));
            if by_slug.contains_key(&article.slug) {
                warn!(
                    slug = %article.slug,
                    path = %path.display(),
                    "skipping file with colliding slug"
                );
                continue;
            }
            by_slug.insert(article.slug.clone(), Arc::clone(&article));
            working.push(article);
        }

        sort_articles(&mut working);

        let loaded = working.clone();
        let mut state = self.state.write().await;
        state.articles = working;
        state.by_slug = by_slug;
        state.last_reload = Utc::now();
        drop(state);

        info!(count = loaded.len(), "article load complete");
        Ok(loaded)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Arc<Article>> {
        let state = self.state.read().await;
        state
            .by_slug
            .get(slug)
            .filter(|article| !article.draft)
            .cloned()
            .ok_or_else(|| Error::NotFound(slug.to_string()))
    }

    async fn get_draft_by_slug(&self, slug: &str) -> Result<Arc<Article>> {
        let state = self.state.read().await;
        state
            .by_slug
            .get(slug)
            .filter(|article| article.draft)
            .cloned()
            .ok_or_else(|| Error::NotFound(slug.to_string()))
    }

    async fn get_published(&self) -> Vec<Arc<Article>> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .filter(|a| !a.draft)
            .cloned()
            .collect()
    }

    async fn get_drafts(&self) -> Vec<Arc<Article>> {
        let state = self.state.read().await;
        state.articles.iter().filter(|a| a.draft).cloned().collect()
    }

    async fn get_by_tag(&self, tag: &str) -> Vec<Arc<Article>> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .filter(|a| !a.draft && a.has_tag(tag))
            .cloned()
            .collect()
    }

    async fn get_by_category(&self, category: &str) -> Vec<Arc<Article>> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .filter(|a| !a.draft && a.has_category(category))
            .cloned()
            .collect()
    }

    async fn get_recent(&self, n: usize) -> Vec<Arc<Article>> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .filter(|a| !a.draft)
            .take(n)
            .cloned()
            .collect()
    }

    async fn get_featured(&self) -> Vec<Arc<Article>> {
        let state = self.state.read().await;
        state
            .articles
            .iter()
            .filter(|a| !a.draft && a.featured)
            .cloned()
            .collect()
    }

    async fn get_stats(&self) -> Stats {
        let state = self.state.read().await;
        compute_stats(&state.articles)
    }

    async fn get_last_modified(&self) -> DateTime<Utc> {
        self.state.read().await.last_reload
    }

    async fn reload(&self, cancel: &CancellationToken) -> Result<()> {
        self.load_all(cancel).await.map(|_| ())
    }

    async fn update_draft_status(&self, slug_value: &str, draft: bool) -> Result<()> {
        slug::ensure_path_safe(slug_value)?;

        let mut state = self.state.write().await;
        let current = state
            .by_slug
            .get(slug_value)
            .cloned()
            .ok_or_else(|| Error::NotFound(slug_value.to_string()))?;

        let path = self.resolve_article_path(slug_value).ok_or_else(|| {
            Error::NotFound(format!("no article file found for slug '{slug_value}'"))
        })?;

        let original = tokio::fs::read(&path).await?;
        let original_text = String::from_utf8_lossy(&original);
        let mut document = frontmatter::parse_document(&original_text)?;
        frontmatter::set_draft(&mut document.raw, draft);
        let rewritten = frontmatter::render_document(&document.raw, &document.body)?;

        atomic_rewrite(&path, &rewritten, &original).await?;

        // Disk committed; now flip the in-memory flag.
        let mut updated = (*current).clone();
        updated.draft = draft;
        let updated = Arc::new(updated);
        state
            .by_slug
            .insert(slug_value.to_string(), Arc::clone(&updated));
        if let Some(entry) = state
            .articles
            .iter_mut()
            .find(|a| a.slug == slug_value)
        {
            *entry = updated;
        }

        info!(slug = %slug_value, draft, "draft status updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_article(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn sample(slug: &str, date: &str, draft: bool) -> String {
        format!(
            "---\ntitle: \"Title {slug}\"\nslug: \"{slug}\"\ndate: {date}\ndraft: {draft}\ntags: [go]\ncategories: [tech]\n---\n\nSome body content here.\n"
        )
    }

    fn repo(dir: &TempDir) -> FileRepository {
        FileRepository::new(dir.path(), ContentProcessor::new())
    }

    #[tokio::test]
    async fn loads_and_sorts_by_date_descending() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "old.md", &sample("old", "2024-01-01", false));
        write_article(dir.path(), "new.md", &sample("new", "2025-01-01", false));

        let repository = repo(&dir);
        let loaded = repository.load_all(&CancellationToken::new()).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].slug, "new");
        assert_eq!(loaded[1].slug, "old");
    }

    #[tokio::test]
    async fn date_ties_break_by_slug_ascending() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "bbb.md", &sample("bbb", "2025-01-01", false));
        write_article(dir.path(), "aaa.md", &sample("aaa", "2025-01-01", false));

        let repository = repo(&dir);
        let loaded = repository.load_all(&CancellationToken::new()).await.unwrap();
        assert_eq!(loaded[0].slug, "aaa");
        assert_eq!(loaded[1].slug, "bbb");
    }

    #[tokio::test]
    async fn malformed_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "good.md", &sample("good", "2025-01-01", false));
        write_article(dir.path(), "bad.md", "no frontmatter at all");
        write_article(dir.path(), "worse.md", "---\ntitle: [broken\n---\nbody");
        write_article(dir.path(), "ignored.txt", "not markdown");

        let repository = repo(&dir);
        let loaded = repository.load_all(&CancellationToken::new()).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].slug, "good");
    }

    #[tokio::test]
    async fn slug_collision_keeps_first_file() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "a.md", &sample("same", "2025-01-01", false));
        write_article(dir.path(), "b.md", &sample("same", "2024-01-01", false));

        let repository = repo(&dir);
        let loaded = repository.load_all(&CancellationToken::new()).await.unwrap();
        assert_eq!(loaded.len(), 1);
        // Files sort lexicographically, so a.md wins.
        assert_eq!(loaded[0].title, "Title same");
        assert_eq!(loaded[0].date.format("%Y").to_string(), "2025");
    }

    #[tokio::test]
    async fn nested_directories_are_walked() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("2025/06")).unwrap();
        write_article(
            &dir.path().join("2025/06"),
            "nested.markdown",
            &sample("nested", "2025-06-01", false),
        );

        let repository = repo(&dir);
        let loaded = repository.load_all(&CancellationToken::new()).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].slug, "nested");
    }

    #[tokio::test]
    async fn cancelled_load_returns_canceled() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "a.md", &sample("a", "2025-01-01", false));

        let repository = repo(&dir);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            repository.load_all(&cancel).await,
            Err(Error::Canceled)
        ));
    }

    #[tokio::test]
    async fn missing_directory_aborts_load() {
        let repository = FileRepository::new("/nonexistent/inkpot-test", ContentProcessor::new());
        assert!(matches!(
            repository.load_all(&CancellationToken::new()).await,
            Err(Error::Io(_))
        ));
    }

    #[tokio::test]
    async fn drafts_are_separated() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "pub.md", &sample("pub", "2025-01-01", false));
        write_article(dir.path(), "drf.md", &sample("drf", "2025-01-02", true));

        let repository = repo(&dir);
        repository.load_all(&CancellationToken::new()).await.unwrap();

        assert_eq!(repository.get_published().await.len(), 1);
        assert_eq!(repository.get_drafts().await.len(), 1);
        assert!(repository.get_by_slug("pub").await.is_ok());
        assert!(matches!(
            repository.get_by_slug("drf").await,
            Err(Error::NotFound(_))
        ));
        assert!(repository.get_draft_by_slug("drf").await.is_ok());
    }

    #[tokio::test]
    async fn stats_aggregate() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "a.md", &sample("a", "2025-01-01", false));
        write_article(dir.path(), "b.md", &sample("b", "2025-01-02", false));
        write_article(dir.path(), "d.md", &sample("d", "2025-01-03", true));

        let repository = repo(&dir);
        repository.load_all(&CancellationToken::new()).await.unwrap();
        let stats = repository.get_stats().await;

        assert_eq!(stats.total_articles, 3);
        assert_eq!(stats.published_count, 2);
        assert_eq!(stats.draft_count, 1);
        assert_eq!(stats.tag_count, 1);
        assert_eq!(stats.category_count, 1);
        assert_eq!(stats.top_tags[0], TagCount { tag: "go".into(), count: 2 });
        assert_eq!(stats.recent_articles.len(), 2);
        assert_eq!(stats.recent_articles[0].slug, "b");
    }

    #[tokio::test]
    async fn update_draft_status_rewrites_file_atomically() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "x.md", &sample("x", "2025-01-01", true));

        let repository = repo(&dir);
        repository.load_all(&CancellationToken::new()).await.unwrap();
        repository.update_draft_status("x", false).await.unwrap();

        let on_disk = fs::read_to_string(dir.path().join("x.md")).unwrap();
        assert!(on_disk.contains("draft: false"));
        assert!(!dir.path().join("x.md.tmp").exists());
        assert!(!dir.path().join("x.md.backup").exists());
        assert!(repository.get_by_slug("x").await.is_ok());
    }

    #[tokio::test]
    async fn update_preserves_unknown_frontmatter_keys() {
        let dir = TempDir::new().unwrap();
        let content = "---\ntitle: T\nslug: x\ndate: 2025-01-01\ndraft: true\ncustom_field: keep-me\n---\n\nbody\n";
        write_article(dir.path(), "x.md", content);

        let repository = repo(&dir);
        repository.load_all(&CancellationToken::new()).await.unwrap();
        repository.update_draft_status("x", false).await.unwrap();
        repository.update_draft_status("x", true).await.unwrap();

        let on_disk = fs::read_to_string(dir.path().join("x.md")).unwrap();
        assert!(on_disk.contains("custom_field: keep-me"));
        assert!(on_disk.contains("draft: true"));
    }

    #[tokio::test]
    async fn update_rejects_traversal_slugs() {
        let dir = TempDir::new().unwrap();
        let repository = repo(&dir);
        assert!(matches!(
            repository.update_draft_status("../escape", true).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            repository.update_draft_status("", true).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_unknown_slug_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repository = repo(&dir);
        repository.load_all(&CancellationToken::new()).await.unwrap();
        assert!(matches!(
            repository.update_draft_status("ghost", true).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn reload_picks_up_new_files() {
        let dir = TempDir::new().unwrap();
        write_article(dir.path(), "a.md", &sample("a", "2025-01-01", false));

        let repository = repo(&dir);
        repository.load_all(&CancellationToken::new()).await.unwrap();
        assert!(repository.get_by_slug("new").await.is_err());

        write_article(dir.path(), "new.md", &sample("new", "2025-02-01", false));
        repository.reload(&CancellationToken::new()).await.unwrap();
        assert!(repository.get_by_slug("new").await.is_ok());
    }

    #[tokio::test]
    async fn slug_generated_from_title_when_missing() {
        let dir = TempDir::new().unwrap();
        write_article(
            dir.path(),
            "untitled.md",
            "---\ntitle: \"Go 1.21: What's New?\"\ndate: 2025-01-01\n---\n\nbody\n",
        );

        let repository = repo(&dir);
        let loaded = repository.load_all(&CancellationToken::new()).await.unwrap();
        assert_eq!(loaded[0].slug, "go-121-whats-new");
    }

    #[tokio::test]
    async fn untitled_short_file_becomes_thought() {
        let dir = TempDir::new().unwrap();
        write_article(
            dir.path(),
            "note.md",
            "---\ndate: 2025-01-01\n---\n\na quick note\n",
        );

        let repository = repo(&dir);
        let loaded = repository.load_all(&CancellationToken::new()).await.unwrap();
        assert_eq!(loaded[0].article_type, crate::types::ArticleType::Thought);
        assert!(loaded[0].slug.starts_with("thought-"));
    }
}
