//! Error types and handling for inkpot-core operations.
//!
//! All failures in the article engine surface through a single [`Error`] enum.
//! Errors are categorized so callers (HTTP handlers, CLI front-ends) can map
//! them onto their own status codes, and carry a recoverability hint used by
//! the load path: per-file parse failures are recoverable (log and skip),
//! mutation failures are not.

use thiserror::Error;

/// The main error type for inkpot-core operations.
///
/// All public functions in this crate return `Result<T, Error>`. The variants
/// mirror the failure classes of the engine:
///
/// - [`Error::NotFound`]: slug absent from the in-memory article set
/// - [`Error::Validation`]: invalid slug format or a refused state transition
/// - [`Error::Parse`]: malformed frontmatter or a missing `---` delimiter
/// - [`Error::Io`]: directory walk, file read, or rename failure
/// - [`Error::Cache`]: cache coordinator failure (shutdown races, poisoned state)
/// - [`Error::NotStarted`]: query against a service that was never started
/// - [`Error::Canceled`]: a long operation observed cancellation
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers the directory walk, per-file reads, and the atomic rewrite
    /// performed by the draft toggle. The underlying `std::io::Error` is
    /// preserved for inspection through `source()`.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be parsed into an article.
    ///
    /// Raised for files without a complete frontmatter block and for YAML
    /// that fails to deserialize. During a full load these are recovered
    /// (logged and skipped); from mutation paths they are surfaced.
    #[error("parse error: {0}")]
    Parse(String),

    /// Requested article does not exist in the in-memory set.
    #[error("article not found: {0}")]
    NotFound(String),

    /// Input was rejected before any state was touched.
    ///
    /// Covers malformed slugs (bad characters, traversal sequences, over-long)
    /// and refused state transitions such as publishing an already-published
    /// article.
    #[error("validation error: {0}")]
    Validation(String),

    /// Cache coordinator failure.
    #[error("cache error: {0}")]
    Cache(String),

    /// A query was issued against a composite service that has not been
    /// started (or has been stopped).
    #[error("service not started")]
    NotStarted,

    /// A long operation (load, reload) observed cancellation and stopped
    /// between file reads.
    #[error("operation canceled")]
    Canceled,
}

/// A specialized `Result` type for inkpot-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns a short category label for logging and metrics-free
    /// observability.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Cache(_) => "cache",
            Self::NotStarted => "not_started",
            Self::Canceled => "canceled",
        }
    }

    /// Whether the load path may recover from this error by skipping the
    /// offending file and continuing.
    ///
    /// Parse failures are per-file and never abort a load. I/O and
    /// cancellation errors abort the operation that observed them.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_stable() {
        assert_eq!(Error::Parse("x".into()).category(), "parse");
        assert_eq!(Error::NotFound("x".into()).category(), "not_found");
        assert_eq!(Error::NotStarted.category(), "not_started");
        assert_eq!(Error::Canceled.category(), "canceled");
    }

    #[test]
    fn only_parse_errors_are_recoverable() {
        assert!(Error::Parse("bad yaml".into()).is_recoverable());
        assert!(!Error::NotFound("missing".into()).is_recoverable());
        assert!(!Error::Canceled.is_recoverable());
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(!io.is_recoverable());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::NotFound("hello-world".into());
        assert_eq!(err.to_string(), "article not found: hello-world");
    }
}
