//! pubweave-core: plaintext publication records to resolved citations
//!
//! This library provides the resolution pipeline behind pubweave:
//! - Block parsing of hand-editable plaintext publication lists
//! - Identifier extraction (via `pubweave-identifiers`)
//! - Priority-based dispatch to metadata services (PMID > PMCID > DOI)
//! - Bibliographic fallback search with disambiguation for blocks
//!   carrying no identifier
//! - A durable response cache that makes repeated runs idempotent and
//!   polite to remote services
//!
//! Rendering, configuration loading, and command-line handling are left
//! to callers; the pipeline returns an ordered [`Bibliography`] plus a
//! JSON dump for downstream tooling.
//!
//! ```no_run
//! use pubweave_core::{Resolver, ResolverConfig, SqliteCache};
//!
//! # async fn run() -> pubweave_core::Result<()> {
//! let cache = SqliteCache::open(std::path::Path::new("query_cache.db"))?;
//! let resolver = Resolver::new(ResolverConfig::default());
//! let bibliography = resolver
//!     .resolve_text(&cache, "* Project A\n\nPMID: 123456\n")
//!     .await?;
//! println!("{}", bibliography.to_json().expect("serializable"));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod domain;
pub mod error;
pub mod http;
pub mod input;
pub mod resolve;
pub mod sources;

pub use cache::{MemoryCache, RequestKey, ResponseCache, SqliteCache};
pub use domain::{
    Bibliography, CitationBlock, CslDate, CslItem, CslName, ResolutionStatus, ResolvedCitation,
    ResolvedSection, Section,
};
pub use error::{CacheError, HttpError, ParseError, ResolutionError, ResolveError, Result};
pub use input::parse_input;
pub use resolve::{
    select_candidate, FallbackConfig, FallbackResolver, Resolver, ResolverConfig, SourceDispatcher,
};
pub use sources::{BibCandidate, CrossrefService, DoiService, LitCtxpService};

// Identifier types are part of the public surface
pub use pubweave_identifiers::{
    ExtractedIdentifier, IdentifierKind, IdentifierOrigin, PublisherPattern,
};

/// Returns the version of pubweave-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
