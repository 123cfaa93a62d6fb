//! Resolved output representation

use serde::Serialize;

use pubweave_identifiers::ExtractedIdentifier;

use super::CslItem;

/// Terminal state of a citation's resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionStatus {
    Resolved,
    Unresolved,
}

/// One citation after resolution. Emitted exactly once per input block,
/// whether or not resolution succeeded; an Unresolved entry keeps the raw
/// citation text as its display text.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCitation {
    pub citation_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<ExtractedIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CslItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub status: ResolutionStatus,
    /// Failure display for Unresolved entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ResolvedCitation {
    pub fn is_resolved(&self) -> bool {
        self.status == ResolutionStatus::Resolved
    }

    /// The resolved title when present, otherwise the raw citation text.
    pub fn display_text(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.title.as_deref())
            .unwrap_or(&self.citation_text)
    }
}

/// A section of resolved citations, in input order
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSection {
    pub name: String,
    pub citations: Vec<ResolvedCitation>,
}

/// The assembled output of a run: sections in input order, each holding
/// its citations in input order.
#[derive(Debug, Clone, Serialize)]
pub struct Bibliography {
    pub sections: Vec<ResolvedSection>,
}

impl Bibliography {
    /// Machine-readable dump for downstream tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Total number of citations across sections.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.citations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
