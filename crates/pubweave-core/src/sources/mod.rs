//! Remote metadata service adapters
//!
//! Each service module owns its request shapes and a pure parse function
//! from a raw response body, so parsing stays testable without a network.

pub mod crossref;
pub mod doi_org;
pub mod litctxp;
pub mod traits;

pub use crossref::{BibCandidate, CrossrefService};
pub use doi_org::DoiService;
pub use litctxp::LitCtxpService;
pub use traits::{SourceError, SourceMetadata};

use crate::domain::CslItem;

/// Parse a CSL-JSON body as returned by the citation exporter or by DOI
/// content negotiation.
pub fn parse_csl_item(body: &str) -> Result<CslItem, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Parse(format!("invalid CSL JSON: {}", e)))
}
