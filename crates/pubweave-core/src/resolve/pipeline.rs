//! End-to-end resolution and output assembly
//!
//! Blocks are resolved one at a time in input order with blocking waits
//! on each network call; output preserves section order and within-
//! section block order regardless of which blocks needed fallback.
//! Per-citation failures are caught here and emitted as Unresolved
//! entries; only parse errors abort a run.

use pubweave_identifiers::{
    default_publisher_patterns, extract_candidates, ExtractedIdentifier, IdentifierKind,
    IdentifierOrigin, PublisherPattern,
};

use super::{FallbackConfig, FallbackResolver, SourceDispatcher};
use crate::cache::ResponseCache;
use crate::domain::{
    Bibliography, CitationBlock, CslItem, ResolutionStatus, ResolvedCitation, ResolvedSection,
    Section,
};
use crate::error::{ResolutionError, Result};
use crate::http::HttpClient;
use crate::input::parse_input;
use crate::sources::{CrossrefService, DoiService, LitCtxpService};

/// Pipeline parameters. The contact email is a value, not a file: loading
/// configuration is the caller's concern.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Appended to the User-Agent for polite-pool identification
    pub contact_email: Option<String>,
    /// Bounded retries for transient service failures
    pub max_retries: u32,
    /// Disambiguation parameters for the bibliographic fallback
    pub fallback: FallbackConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            contact_email: None,
            max_retries: 3,
            fallback: FallbackConfig::default(),
        }
    }
}

/// The resolution pipeline. The response cache is passed into every run
/// explicitly so callers control durability and tests can substitute an
/// in-memory store.
pub struct Resolver {
    http: HttpClient,
    dispatcher: SourceDispatcher,
    fallback: FallbackResolver,
    publishers: Vec<PublisherPattern>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_services(
            config,
            LitCtxpService::new(),
            DoiService::new(),
            CrossrefService::new(),
        )
    }

    /// Build a resolver against explicit service endpoints (tests point
    /// these at mock servers).
    pub fn with_services(
        config: ResolverConfig,
        litctxp: LitCtxpService,
        doi: DoiService,
        crossref: CrossrefService,
    ) -> Self {
        let user_agent = match &config.contact_email {
            Some(email) => format!(
                "pubweave/{} (mailto:{})",
                env!("CARGO_PKG_VERSION"),
                email
            ),
            None => format!("pubweave/{}", env!("CARGO_PKG_VERSION")),
        };
        Self {
            http: HttpClient::new(&user_agent, config.max_retries),
            dispatcher: SourceDispatcher::with_services(litctxp, doi),
            fallback: FallbackResolver::with_service(crossref, config.fallback),
            publishers: default_publisher_patterns(),
        }
    }

    /// Replace the publisher URL table.
    pub fn with_publisher_patterns(mut self, patterns: Vec<PublisherPattern>) -> Self {
        self.publishers = patterns;
        self
    }

    /// Parse raw input text and resolve every block. Structural errors
    /// abort before any network activity.
    pub async fn resolve_text(
        &self,
        cache: &dyn ResponseCache,
        input: &str,
    ) -> Result<Bibliography> {
        let sections = parse_input(input)?;
        Ok(self.resolve_sections(cache, &sections).await)
    }

    /// Resolve already-parsed sections, preserving their order.
    pub async fn resolve_sections(
        &self,
        cache: &dyn ResponseCache,
        sections: &[Section],
    ) -> Bibliography {
        let mut resolved = Vec::with_capacity(sections.len());
        for section in sections {
            let mut citations = Vec::with_capacity(section.blocks.len());
            for (index, block) in section.blocks.iter().enumerate() {
                citations.push(self.resolve_block(cache, &section.name, index, block).await);
            }
            resolved.push(ResolvedSection {
                name: section.name.clone(),
                citations,
            });
        }
        Bibliography { sections: resolved }
    }

    async fn resolve_block(
        &self,
        cache: &dyn ResponseCache,
        section: &str,
        index: usize,
        block: &CitationBlock,
    ) -> ResolvedCitation {
        match self.resolve_metadata(cache, section, index, block).await {
            Ok((identifier, metadata)) => ResolvedCitation {
                citation_text: block.citation_text.clone(),
                identifier: Some(identifier),
                metadata: Some(metadata),
                comment: block.comment.clone(),
                status: ResolutionStatus::Resolved,
                failure: None,
            },
            Err(e) => {
                tracing::warn!(section, block = index, error = %e, "citation left unresolved");
                ResolvedCitation {
                    citation_text: block.citation_text.clone(),
                    identifier: None,
                    metadata: None,
                    comment: block.comment.clone(),
                    status: ResolutionStatus::Unresolved,
                    failure: Some(e.to_string()),
                }
            }
        }
    }

    async fn resolve_metadata(
        &self,
        cache: &dyn ResponseCache,
        section: &str,
        index: usize,
        block: &CitationBlock,
    ) -> std::result::Result<(ExtractedIdentifier, CslItem), ResolutionError> {
        let candidates = extract_candidates(&block.scan_lines(), &self.publishers);

        if let Some(identifier) = self.dispatcher.select(&candidates) {
            tracing::debug!(
                section,
                block = index,
                kind = %identifier.kind,
                value = %identifier.value,
                "direct fetch"
            );
            let identifier = identifier.clone();
            let metadata = self.dispatcher.fetch(&self.http, cache, &identifier).await?;
            return Ok((identifier, metadata));
        }

        tracing::debug!(section, block = index, "no identifier, bibliographic fallback");
        let accepted = self
            .fallback
            .resolve(&self.http, cache, &block.citation_text)
            .await?;
        let identifier = ExtractedIdentifier {
            kind: IdentifierKind::Doi,
            value: accepted.doi,
            origin: IdentifierOrigin::BibliographicQuery,
        };
        let metadata = self.dispatcher.fetch(&self.http, cache, &identifier).await?;
        Ok((identifier, metadata))
    }
}
