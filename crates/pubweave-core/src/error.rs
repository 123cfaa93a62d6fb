//! Error types for the resolution pipeline

use thiserror::Error;

use pubweave_identifiers::IdentifierKind;

/// Result type alias for pipeline entry points
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that abort a whole run
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Input violates block-shape rules; the caller must fix the input
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Cache store could not be used
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Structural errors in the input text. All fatal; detected before any
/// network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("block starting at line {line} has more than three lines")]
    TooManyLines { line: usize },

    #[error("block starting at line {line} contains two URL lines")]
    DuplicateUrl { line: usize },

    #[error("block starting at line {line} contains two comment lines")]
    DuplicateComment { line: usize },

    #[error("citation block at line {line} appears before any section header")]
    BlockOutsideSection { line: usize },
}

/// HTTP-level failures, classified for retry policy
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("request failed: {message}")]
    RequestFailed { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("rate limited by server")]
    RateLimited,

    #[error("server error: HTTP {status}")]
    ServerError { status: u16 },

    #[error("client error: HTTP {status}")]
    ClientError { status: u16 },

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl HttpError {
    /// Whether the failure is worth retrying with backoff.
    /// Timeouts, connection faults, 429 and 5xx are transient; 4xx and
    /// malformed URLs are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HttpError::Timeout
                | HttpError::RateLimited
                | HttpError::ServerError { .. }
                | HttpError::RequestFailed { .. }
        )
    }
}

/// Per-citation resolution failures. Recovered at block level: the
/// citation is emitted as Unresolved and the run continues.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("metadata fetch for {kind} {value} failed: {reason}")]
    UnresolvedIdentifier {
        kind: IdentifierKind,
        value: String,
        reason: String,
    },

    #[error("bibliographic search returned no acceptable match")]
    NoBibliographicMatch,

    #[error("bibliographic search ambiguous between {count} candidates")]
    AmbiguousBibliographicMatch { count: usize },

    #[error("bibliographic search failed: {reason}")]
    Search { reason: String },

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Cache store faults
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::Storage(err.to_string())
    }
}
