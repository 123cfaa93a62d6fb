//! Priority-based candidate selection
//!
//! When a block yields candidates of several kinds, exactly one is chosen
//! under the fixed priority PMID > PMCID > DOI, irrespective of origin.

use crate::extractors::{ExtractedIdentifier, IdentifierKind};

impl IdentifierKind {
    /// Selection rank; lower wins
    pub fn priority(self) -> u8 {
        match self {
            IdentifierKind::Pmid => 0,
            IdentifierKind::Pmcid => 1,
            IdentifierKind::Doi => 2,
        }
    }
}

/// Select the single highest-priority candidate, if any.
///
/// Ties on kind cannot occur for callers that deduplicate per kind, but if
/// they do, the first candidate in iteration order wins.
pub fn select_preferred(candidates: &[ExtractedIdentifier]) -> Option<&ExtractedIdentifier> {
    candidates.iter().min_by_key(|c| c.kind.priority())
}
