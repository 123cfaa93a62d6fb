//! NCBI Literature Citation Exporter
//!
//! Serves CSL JSON for PubMed and PubMed Central records.
//! API docs: https://api.ncbi.nlm.nih.gov/lit/ctxp
//! Rate limit: 3 requests/second without an API key

use super::traits::SourceMetadata;
use crate::cache::RequestKey;

const PUBMED_PATH: &str = "/lit/ctxp/v1/pubmed/";
const PMC_PATH: &str = "/lit/ctxp/v1/pmc/";

pub struct LitCtxpService {
    base_url: String,
}

impl Default for LitCtxpService {
    fn default() -> Self {
        Self::new()
    }
}

impl LitCtxpService {
    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "lit-ctxp",
            name: "NCBI Literature Citation Exporter",
            description: "CSL metadata for PubMed and PubMed Central records",
            base_url: "https://api.ncbi.nlm.nih.gov",
            rate_limit_per_second: 3.0,
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

    /// Request shape for a PMID lookup.
    pub fn pubmed_request(&self, pmid: &str) -> (RequestKey, String) {
        self.request(PUBMED_PATH, pmid)
    }

    /// Request shape for a PMCID lookup. Takes the bare digits; the PMC
    /// prefix the exporter expects is added here.
    pub fn pmc_request(&self, pmcid_digits: &str) -> (RequestKey, String) {
        self.request(PMC_PATH, &format!("PMC{}", pmcid_digits))
    }

    fn request(&self, path: &str, id: &str) -> (RequestKey, String) {
        let query = [("format", "csl"), ("contenttype", "json"), ("id", id)];
        let key = RequestKey::get(Self::metadata().id, path, &query);
        let url = format!(
            "{}{}?format=csl&contenttype=json&id={}",
            self.base_url,
            path,
            urlencoding::encode(id)
        );
        (key, url)
    }
}
