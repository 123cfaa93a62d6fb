//! Bibliographic fallback resolution
//!
//! Invoked only when a block yields no identifier candidates. The raw
//! citation text is used for querying and never substituted for a
//! verified identifier: an accepted search candidate contributes only its
//! DOI, which the caller re-dispatches for canonical metadata.
//!
//! Per-block state machine:
//! `BibSearch -> { NoCandidate | Accepted -> DOIRequery | Ambiguous }`,
//! with NoCandidate and Ambiguous terminating in Unresolved and the
//! requery sharing the dispatcher's cache discipline.

use std::collections::HashSet;

use super::{cached_get, FetchError};
use crate::cache::ResponseCache;
use crate::error::ResolutionError;
use crate::http::{HttpClient, Throttle};
use crate::sources::{BibCandidate, CrossrefService};

/// Disambiguation parameters. The threshold and margin are deliberately
/// tunable; the defaults are conservative starting points, not calibrated
/// constants.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Minimum relevance score a candidate must clear to be accepted
    pub min_score: f64,
    /// Candidates within this margin of the top score form a near-tie
    pub tie_margin: f64,
    /// How many ranked works to request from the search service
    pub rows: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            min_score: 60.0,
            tie_margin: 5.0,
            rows: 5,
        }
    }
}

pub struct FallbackResolver {
    crossref: CrossrefService,
    throttle: Throttle,
    config: FallbackConfig,
}

impl FallbackResolver {
    pub fn new(config: FallbackConfig) -> Self {
        Self::with_service(CrossrefService::new(), config)
    }

    pub fn with_service(crossref: CrossrefService, config: FallbackConfig) -> Self {
        Self {
            crossref,
            throttle: Throttle::per_second(CrossrefService::metadata().rate_limit_per_second),
            config,
        }
    }

    /// Search for the citation text and pick a single candidate, or
    /// refuse. Never guesses: an inconclusive tie is an error, not a
    /// best-effort pick.
    pub async fn resolve(
        &self,
        http: &HttpClient,
        cache: &dyn ResponseCache,
        citation_text: &str,
    ) -> Result<BibCandidate, ResolutionError> {
        let (key, url) = self.crossref.search_request(citation_text, self.config.rows);

        let body = cached_get(http, cache, &self.throttle, &key, &url, &[])
            .await
            .map_err(|e| match e {
                FetchError::Cache(c) => ResolutionError::Cache(c),
                FetchError::Http(h) => ResolutionError::Search {
                    reason: h.to_string(),
                },
            })?;

        let candidates = CrossrefService::parse_search_response(&body).map_err(|e| {
            ResolutionError::Search {
                reason: e.to_string(),
            }
        })?;

        select_candidate(&candidates, citation_text, &self.config).cloned()
    }
}

/// Pick one candidate from a ranked list, or refuse.
///
/// Acceptance: the top score must clear `min_score`. Candidates within
/// `tie_margin` of the top form the tie set; a singleton is accepted
/// directly. Ties break in order: published work over preprint, most
/// recent year, strictly larger title token overlap with the input text.
/// Anything still tied is ambiguous.
pub fn select_candidate<'a>(
    candidates: &'a [BibCandidate],
    citation_text: &str,
    config: &FallbackConfig,
) -> Result<&'a BibCandidate, ResolutionError> {
    if candidates.is_empty() {
        return Err(ResolutionError::NoBibliographicMatch);
    }

    let top_score = candidates.iter().map(|c| c.score).fold(f64::MIN, f64::max);
    if top_score < config.min_score {
        return Err(ResolutionError::NoBibliographicMatch);
    }

    let ties: Vec<&BibCandidate> = candidates
        .iter()
        .filter(|c| c.score >= config.min_score && top_score - c.score <= config.tie_margin)
        .collect();
    if ties.len() == 1 {
        return Ok(ties[0]);
    }

    // Published work beats preprint
    let published: Vec<&BibCandidate> = ties
        .iter()
        .copied()
        .filter(|c| !c.is_preprint())
        .collect();
    let pool = if published.is_empty() { ties } else { published };
    if pool.len() == 1 {
        return Ok(pool[0]);
    }

    // Most recent publication year
    let best_year = pool.iter().filter_map(|c| c.year).max();
    let pool: Vec<&BibCandidate> = match best_year {
        Some(year) => pool
            .into_iter()
            .filter(|c| c.year == Some(year))
            .collect(),
        None => pool,
    };
    if pool.len() == 1 {
        return Ok(pool[0]);
    }

    // Strictly larger title token overlap with the input
    let input_tokens = tokenize(citation_text);
    let overlaps: Vec<usize> = pool
        .iter()
        .map(|c| {
            c.title
                .as_deref()
                .map(|t| tokenize(t).intersection(&input_tokens).count())
                .unwrap_or(0)
        })
        .collect();
    let best_overlap = overlaps.iter().copied().max().unwrap_or(0);
    let winners: Vec<&BibCandidate> = pool
        .iter()
        .zip(&overlaps)
        .filter(|(_, &o)| o == best_overlap)
        .map(|(c, _)| *c)
        .collect();

    if winners.len() == 1 {
        Ok(winners[0])
    } else {
        Err(ResolutionError::AmbiguousBibliographicMatch {
            count: winners.len(),
        })
    }
}

/// Case-insensitive, punctuation-stripped word set
fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
