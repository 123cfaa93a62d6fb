//! Crossref bibliographic search
//!
//! Free-text `query.bibliographic` search used by the fallback resolver.
//! The search result is never the final metadata: an accepted candidate
//! only contributes its DOI, which is re-fetched through content
//! negotiation.
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html

use serde::Deserialize;

use super::traits::{SourceError, SourceMetadata};
use crate::cache::RequestKey;

const WORKS_PATH: &str = "/works";

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    message: CrossrefMessage,
}

#[derive(Debug, Deserialize)]
struct CrossrefMessage {
    #[serde(default)]
    items: Vec<CrossrefWork>,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    title: Option<Vec<String>>,
    #[serde(rename = "type")]
    work_type: Option<String>,
    subtype: Option<String>,
    score: Option<f64>,
    #[serde(rename = "published-print")]
    published_print: Option<CrossrefDate>,
    #[serde(rename = "published-online")]
    published_online: Option<CrossrefDate>,
    issued: Option<CrossrefDate>,
}

#[derive(Debug, Deserialize)]
struct CrossrefDate {
    #[serde(rename = "date-parts")]
    date_parts: Option<Vec<Vec<i32>>>,
}

impl CrossrefDate {
    fn year(&self) -> Option<i32> {
        self.date_parts
            .as_ref()
            .and_then(|dp| dp.first())
            .and_then(|parts| parts.first().copied())
    }
}

/// A ranked candidate work from the bibliographic search
#[derive(Debug, Clone, PartialEq)]
pub struct BibCandidate {
    pub doi: String,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub work_type: Option<String>,
    pub subtype: Option<String>,
    pub score: f64,
}

impl BibCandidate {
    /// Whether the candidate is a preprint-like work rather than a
    /// final published version.
    pub fn is_preprint(&self) -> bool {
        let type_is_preprint = matches!(
            self.work_type.as_deref(),
            Some("posted-content") | Some("preprint")
        );
        type_is_preprint || self.subtype.as_deref() == Some("preprint")
    }
}

pub struct CrossrefService {
    base_url: String,
}

impl Default for CrossrefService {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossrefService {
    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "crossref",
            name: "Crossref",
            description: "Free-text bibliographic query over registered works",
            base_url: "https://api.crossref.org",
            rate_limit_per_second: 50.0,
        }
    }

    pub fn new() -> Self {
        Self::with_base_url(Self::metadata().base_url)
    }

    /// Point the service at another base URL (tests use a mock server).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Request shape for a free-text bibliographic search.
    pub fn search_request(&self, text: &str, rows: u32) -> (RequestKey, String) {
        let rows_str = rows.to_string();
        let query = [("query.bibliographic", text), ("rows", rows_str.as_str())];
        let key = RequestKey::get(Self::metadata().id, WORKS_PATH, &query);
        let url = format!(
            "{}{}?query.bibliographic={}&rows={}",
            self.base_url,
            WORKS_PATH,
            urlencoding::encode(text),
            rows
        );
        (key, url)
    }

    /// Parse a `/works` search response into ranked candidates. Works
    /// without a DOI or score are dropped: they can never be accepted.
    pub fn parse_search_response(json: &str) -> Result<Vec<BibCandidate>, SourceError> {
        let response: CrossrefResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("invalid Crossref JSON: {}", e)))?;

        Ok(response
            .message
            .items
            .into_iter()
            .filter_map(|work| {
                let doi = work.doi?;
                let score = work.score?;
                let year = work
                    .published_print
                    .as_ref()
                    .and_then(|d| d.year())
                    .or_else(|| work.published_online.as_ref().and_then(|d| d.year()))
                    .or_else(|| work.issued.as_ref().and_then(|d| d.year()));
                Some(BibCandidate {
                    doi,
                    title: work.title.and_then(|t| t.into_iter().next()),
                    year,
                    work_type: work.work_type,
                    subtype: work.subtype,
                    score,
                })
            })
            .collect())
    }
}
