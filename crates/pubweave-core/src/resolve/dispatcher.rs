//! Priority-based source dispatch
//!
//! Picks the single highest-priority identifier for a block and routes
//! it to the matching metadata service under the cache discipline.

use pubweave_identifiers::{select_preferred, ExtractedIdentifier, IdentifierKind};

use super::cached_get;
use crate::cache::ResponseCache;
use crate::domain::CslItem;
use crate::error::ResolutionError;
use crate::http::{HttpClient, Throttle};
use crate::sources::{doi_org, parse_csl_item, DoiService, LitCtxpService};

pub struct SourceDispatcher {
    litctxp: LitCtxpService,
    doi: DoiService,
    litctxp_throttle: Throttle,
    doi_throttle: Throttle,
}

impl Default for SourceDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceDispatcher {
    pub fn new() -> Self {
        Self::with_services(LitCtxpService::new(), DoiService::new())
    }

    pub fn with_services(litctxp: LitCtxpService, doi: DoiService) -> Self {
        Self {
            litctxp,
            doi,
            litctxp_throttle: Throttle::per_second(
                LitCtxpService::metadata().rate_limit_per_second,
            ),
            doi_throttle: Throttle::per_second(DoiService::metadata().rate_limit_per_second),
        }
    }

    /// Select the identifier the block resolves through, if any.
    pub fn select<'a>(
        &self,
        candidates: &'a [ExtractedIdentifier],
    ) -> Option<&'a ExtractedIdentifier> {
        select_preferred(candidates)
    }

    /// Fetch structured metadata for one identifier. A cache hit is
    /// served without a network call; a miss is fetched, stored, then
    /// parsed. Any failure marks the citation Unresolved upstream.
    pub async fn fetch(
        &self,
        http: &HttpClient,
        cache: &dyn ResponseCache,
        identifier: &ExtractedIdentifier,
    ) -> Result<CslItem, ResolutionError> {
        let (key, url, headers, throttle) = match identifier.kind {
            IdentifierKind::Pmid => {
                let (key, url) = self.litctxp.pubmed_request(&identifier.value);
                (key, url, Vec::new(), &self.litctxp_throttle)
            }
            IdentifierKind::Pmcid => {
                let (key, url) = self.litctxp.pmc_request(&identifier.value);
                (key, url, Vec::new(), &self.litctxp_throttle)
            }
            IdentifierKind::Doi => {
                let (key, url) = self.doi.request(&identifier.value);
                (
                    key,
                    url,
                    vec![("Accept", doi_org::CSL_JSON)],
                    &self.doi_throttle,
                )
            }
        };

        let unresolved = |reason: String| ResolutionError::UnresolvedIdentifier {
            kind: identifier.kind,
            value: identifier.value.clone(),
            reason,
        };

        let body = cached_get(http, cache, throttle, &key, &url, &headers)
            .await
            .map_err(|e| unresolved(e.to_string()))?;

        parse_csl_item(&body).map_err(|e| unresolved(e.to_string()))
    }
}
