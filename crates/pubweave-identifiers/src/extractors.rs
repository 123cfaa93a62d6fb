//! Identifier extraction from citation text and URLs

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::publishers::PublisherPattern;

/// Kind of scholarly identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    /// PubMed identifier
    Pmid,
    /// PubMed Central identifier (stored as bare digits, no "PMC" prefix)
    Pmcid,
    /// Digital Object Identifier
    Doi,
}

impl IdentifierKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Pmid => "pmid",
            IdentifierKind::Pmcid => "pmcid",
            IdentifierKind::Doi => "doi",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a candidate identifier was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierOrigin {
    /// Tagged form in free text (`PMID: 123`, `doi: 10.x/y`)
    ExplicitText,
    /// Recognized URL shape (resolver, publisher, PubMed, PMC)
    UrlPattern,
    /// Accepted result of a bibliographic search
    BibliographicQuery,
}

/// A candidate identifier extracted from a citation block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
    pub origin: IdentifierOrigin,
}

lazy_static! {
    // Tagged identifiers; tag is case-insensitive, space after the colon optional
    static ref TAGGED_PMID: Regex = Regex::new(r"(?i)\bPMID:\s?(?P<id>\d+)").unwrap();
    static ref TAGGED_PMCID: Regex = Regex::new(r"(?i)\bPMCID:\s?(?:PMC)?(?P<id>\d+)").unwrap();
    static ref TAGGED_DOI: Regex =
        Regex::new(r#"(?i)\bdoi:\s?(?P<doi>10\.\d{4,}/[^\s\]}>"',;]+)"#).unwrap();

    // DOI resolver URL forms (doi.org, dx.doi.org)
    static ref DOI_URL: Regex = Regex::new(
        r#"(?i)(?:https?://)?(?:dx\.)?doi\.org/(?P<doi>10\.\d{4,}/[^\s\]}>"',;]+)"#
    ).unwrap();

    // PubMed article URL
    static ref PUBMED_URL: Regex =
        Regex::new(r"(?i)pubmed\.ncbi\.nlm\.nih\.gov/(?P<id>\d+)").unwrap();

    // PubMed Central article URL
    static ref PMC_URL: Regex =
        Regex::new(r"(?i)ncbi\.nlm\.nih\.gov/pmc/articles/PMC(?P<id>\d+)").unwrap();
}

/// Clean a DOI by removing trailing punctuation the pattern may have captured
pub fn clean_doi(doi: &str) -> String {
    let mut s = doi.to_string();
    while let Some(c) = s.chars().last() {
        if c == '.' || c == ',' || c == ';' || c == ')' || c == ']' {
            s.pop();
        } else {
            break;
        }
    }
    s
}

/// Extract all candidate identifiers from a single line.
///
/// Rules run in fixed order: tagged identifiers, DOI resolver URLs,
/// publisher URL patterns, PubMed URLs, PMC URLs. Matches are returned in
/// rule order; callers that need the keep-first-duplicate policy should go
/// through [`extract_candidates`].
pub fn extract_from_line(line: &str, publishers: &[PublisherPattern]) -> Vec<ExtractedIdentifier> {
    let mut results = Vec::new();

    for cap in TAGGED_PMID.captures_iter(line) {
        results.push(ExtractedIdentifier {
            kind: IdentifierKind::Pmid,
            value: cap["id"].to_string(),
            origin: IdentifierOrigin::ExplicitText,
        });
    }
    for cap in TAGGED_PMCID.captures_iter(line) {
        results.push(ExtractedIdentifier {
            kind: IdentifierKind::Pmcid,
            value: cap["id"].to_string(),
            origin: IdentifierOrigin::ExplicitText,
        });
    }
    for cap in TAGGED_DOI.captures_iter(line) {
        results.push(ExtractedIdentifier {
            kind: IdentifierKind::Doi,
            value: clean_doi(&cap["doi"]),
            origin: IdentifierOrigin::ExplicitText,
        });
    }

    for cap in DOI_URL.captures_iter(line) {
        results.push(ExtractedIdentifier {
            kind: IdentifierKind::Doi,
            value: clean_doi(&cap["doi"]),
            origin: IdentifierOrigin::UrlPattern,
        });
    }

    for pattern in publishers {
        for cap in pattern.regex.captures_iter(line) {
            if let Some(m) = cap.name("doi") {
                results.push(ExtractedIdentifier {
                    kind: IdentifierKind::Doi,
                    value: clean_doi(m.as_str()),
                    origin: IdentifierOrigin::UrlPattern,
                });
            }
        }
    }

    for cap in PUBMED_URL.captures_iter(line) {
        results.push(ExtractedIdentifier {
            kind: IdentifierKind::Pmid,
            value: cap["id"].to_string(),
            origin: IdentifierOrigin::UrlPattern,
        });
    }
    for cap in PMC_URL.captures_iter(line) {
        results.push(ExtractedIdentifier {
            kind: IdentifierKind::Pmcid,
            value: cap["id"].to_string(),
            origin: IdentifierOrigin::UrlPattern,
        });
    }

    results
}

/// Extract candidates from the lines of a citation block, in order.
///
/// Lines are scanned in the order given (citation text before URL). When
/// the same kind matches more than once, the first value under the
/// line-then-rule iteration order wins and later values are discarded.
pub fn extract_candidates(
    lines: &[&str],
    publishers: &[PublisherPattern],
) -> Vec<ExtractedIdentifier> {
    let mut candidates: Vec<ExtractedIdentifier> = Vec::new();

    for line in lines {
        for found in extract_from_line(line, publishers) {
            if !candidates.iter().any(|c| c.kind == found.kind) {
                candidates.push(found);
            }
        }
    }

    candidates
}
