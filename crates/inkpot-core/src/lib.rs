//! # inkpot-core
//!
//! Core article engine for a file-based blog: a directory of markdown
//! files with YAML frontmatter becomes an in-memory corpus with cached
//! lookups, an inverted search index, and an atomic draft-toggle mutation
//! protocol.
//!
//! ## Architecture
//!
//! The crate is organized around a handful of collaborating components:
//!
//! - **Repository**: directory scanning, frontmatter parsing, and the
//!   atomic on-disk mutation protocol
//! - **Content Processor**: markdown rendering and derived metadata
//!   (excerpts, reading time, link extraction)
//! - **Cache Coordinator**: TTL + LRU caching with typed namespaces and
//!   atomic statistics
//! - **Search Service**: tokenization, field-weighted scoring, and the
//!   inverted index fast path
//! - **Composite Service**: the single public contract wiring the above
//!   together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inkpot_core::{ArticleService, CompositeService, Config};
//!
//! # async fn run() -> inkpot_core::Result<()> {
//! let config = Config::new("articles");
//! let service = CompositeService::new(&config)?;
//! service.start().await?;
//!
//! let articles = service.get_all_articles().await?;
//! println!("{} published articles", articles.len());
//!
//! let results = service.search_articles("rust", 10).await?;
//! for result in results {
//!     println!("{} ({:.1})", result.article.title, result.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! The engine is multi-threaded and shared-memory. Reads go through
//! reader-writer locks with atomic counters; loads and reloads replace
//! state wholesale under the write lock so readers never observe a torn
//! corpus. Long operations observe a cancellation token between file
//! reads.

/// Caching with TTL entries, LRU eviction, and typed namespaces
pub mod cache;
/// Caching decorator over the repository contract
pub mod cached_repository;
/// Engine configuration
pub mod config;
/// Error types and result alias
pub mod error;
/// Frontmatter parsing and round-trip re-serialization
pub mod frontmatter;
/// Markdown rendering and derived content metadata
pub mod processor;
/// Article repository: scanning, parsing, atomic mutation
pub mod repository;
/// Full-text search and the inverted index
pub mod search;
/// Composite service: the public contract
pub mod service;
/// Slug generation and validation
pub mod slug;
/// Core data types
pub mod types;

// Re-export commonly used types
pub use cache::{ArticleCache, CacheStats};
pub use cached_repository::CachedRepository;
pub use config::{CacheSettings, Config};
pub use error::{Error, Result};
pub use frontmatter::{Document, Frontmatter};
pub use processor::ContentProcessor;
pub use repository::{ArticleRepository, FileRepository, SUPPORTED_EXTENSIONS};
pub use search::{SearchService, tokenize};
pub use service::{ArticleService, CompositeService};
pub use slug::{slugify, validate_slug};
pub use types::*;
