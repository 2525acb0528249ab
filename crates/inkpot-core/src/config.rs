//! Configuration for the article engine.
//!
//! Configuration is a plain struct the embedding application constructs
//! directly, with an optional TOML file loader and `INKPOT_*` environment
//! variable overrides for deployments that prefer external configuration.
//!
//! ## Example Configuration File
//!
//! ```toml
//! articles_path = "/var/lib/inkpot/articles"
//!
//! [cache]
//! enabled = true
//! max_entries = 1000
//! article_ttl_secs = 3600
//! search_ttl_secs = 1800
//! content_ttl_secs = 7200
//! cleanup_period_secs = 300
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine configuration: the articles directory plus cache tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned for markdown articles. Required, must be non-empty.
    ///
    /// The engine owns this directory exclusively; there is no cross-process
    /// coordination protocol.
    pub articles_path: PathBuf,

    /// Cache coordinator settings.
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Cache tuning knobs.
///
/// TTLs are per-namespace: articles, search results, and processed content
/// age out independently. A `cleanup_period_secs` of `0` disables the
/// background cleanup task (entries still expire lazily on read).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Whether the cached repository decorator is installed at all.
    pub enabled: bool,

    /// Upper bound on cache entries before LRU eviction kicks in.
    pub max_entries: usize,

    /// Lifetime of `article:{slug}` entries, in seconds.
    pub article_ttl_secs: u64,

    /// Lifetime of `search:{query}:{limit}` entries, in seconds.
    pub search_ttl_secs: u64,

    /// Lifetime of `content:{hash}` entries, in seconds.
    pub content_ttl_secs: u64,

    /// Background cleanup tick period, in seconds. `0` disables the task.
    pub cleanup_period_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            article_ttl_secs: 3600,
            search_ttl_secs: 1800,
            content_ttl_secs: 7200,
            cleanup_period_secs: 300,
        }
    }
}

impl CacheSettings {
    /// Article namespace TTL as a [`Duration`].
    #[must_use]
    pub const fn article_ttl(&self) -> Duration {
        Duration::from_secs(self.article_ttl_secs)
    }

    /// Search namespace TTL as a [`Duration`].
    #[must_use]
    pub const fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    /// Processed-content namespace TTL as a [`Duration`].
    #[must_use]
    pub const fn content_ttl(&self) -> Duration {
        Duration::from_secs(self.content_ttl_secs)
    }

    /// Cleanup period, or `None` when background cleanup is disabled.
    #[must_use]
    pub const fn cleanup_period(&self) -> Option<Duration> {
        if self.cleanup_period_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.cleanup_period_secs))
        }
    }
}

impl Config {
    /// Creates a configuration for the given articles directory with default
    /// cache settings.
    #[must_use]
    pub fn new(articles_path: impl Into<PathBuf>) -> Self {
        Self {
            articles_path: articles_path.into(),
            cache: CacheSettings::default(),
        }
    }

    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the file cannot be read, contains
    /// invalid TOML, or fails [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Validation(format!("failed to read config: {e}")))?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| Error::Validation(format!("failed to parse config: {e}")))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `INKPOT_*` environment variable overrides in place.
    ///
    /// Recognized variables: `INKPOT_ARTICLES_PATH`, `INKPOT_CACHE_ENABLED`,
    /// `INKPOT_CACHE_MAX_ENTRIES`. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("INKPOT_ARTICLES_PATH") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                self.articles_path = PathBuf::from(trimmed);
            }
        }
        if let Ok(enabled) = std::env::var("INKPOT_CACHE_ENABLED") {
            if let Ok(value) = enabled.trim().parse::<bool>() {
                self.cache.enabled = value;
            }
        }
        if let Ok(max) = std::env::var("INKPOT_CACHE_MAX_ENTRIES") {
            if let Ok(value) = max.trim().parse::<usize>() {
                self.cache.max_entries = value;
            }
        }
    }

    /// Validate the configuration before the engine starts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the articles path is empty or the
    /// cache is enabled with a zero entry bound.
    pub fn validate(&self) -> Result<()> {
        if self.articles_path.as_os_str().is_empty() {
            return Err(Error::Validation("articles_path must be set".into()));
        }
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(Error::Validation(
                "cache.max_entries must be positive when the cache is enabled".into(),
            ));
        }
        Ok(())
    }
}
