//! pubweave-identifiers: scholarly identifier extraction
//!
//! This crate provides pure Rust implementations of:
//! - Identifier kinds and extraction candidates (PMID, PMCID, DOI)
//! - Tagged-text and URL pattern matching
//! - A declarative publisher URL table for DOIs embedded in article links
//! - Priority-based candidate selection
//!
//! No I/O happens here; resolution against remote services lives in
//! `pubweave-core`.

pub mod extractors;
pub mod publishers;
pub mod resolver;

pub use extractors::{
    clean_doi, extract_candidates, extract_from_line, ExtractedIdentifier, IdentifierKind,
    IdentifierOrigin,
};
pub use publishers::{default_publisher_patterns, PublisherPattern};
pub use resolver::select_preferred;
