//! DOI content negotiation
//!
//! A DOI resolves to structured metadata by requesting the CSL JSON
//! representation from the resolver.
//! Docs: https://citation.crosscite.org/docs.html

use super::traits::SourceMetadata;
use crate::cache::RequestKey;

/// Accept header value selecting the CSL JSON representation
pub const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";

pub struct DoiService {
    base_url: String,
}

impl Default for DoiService {
    fn default() -> Self {
        Self::new()
    }
}

impl DoiService {
    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "doi-org",
            name: "DOI content negotiation",
            description: "CSL metadata from the DOI resolver",
            base_url: "https://doi.org",
            rate_limit_per_second: 5.0,
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

    /// Request shape for a DOI lookup. The DOI rides in the path; the
    /// caller must send the [`CSL_JSON`] Accept header.
    pub fn request(&self, doi: &str) -> (RequestKey, String) {
        let path = format!("/{}", doi);
        let key = RequestKey::get(Self::metadata().id, &path, &[]);
        let url = format!("{}/{}", self.base_url, doi);
        (key, url)
    }
}
