//! Shared helpers for integration tests

use mockito::ServerGuard;

use pubweave_core::{
    CrossrefService, DoiService, FallbackConfig, LitCtxpService, Resolver, ResolverConfig,
};

/// Minimal CSL JSON body the metadata services return
#[allow(dead_code)]
pub fn csl_body(title: &str, doi: &str) -> String {
    format!(
        r#"{{
            "type": "article-journal",
            "title": "{}",
            "DOI": "{}",
            "author": [{{"family": "Doe", "given": "John"}}],
            "container-title": "Some Journal",
            "issued": {{"date-parts": [[2023]]}}
        }}"#,
        title, doi
    )
}

/// A Crossref search body with a single high-scoring candidate
#[allow(dead_code)]
pub fn search_body_single(doi: &str, score: f64) -> String {
    format!(
        r#"{{
            "status": "ok",
            "message": {{
                "items": [{{
                    "DOI": "{}",
                    "title": ["A found paper"],
                    "type": "journal-article",
                    "score": {},
                    "issued": {{"date-parts": [[2022]]}}
                }}]
            }}
        }}"#,
        doi, score
    )
}

/// Resolver with every service pointed at the given mock server
#[allow(dead_code)]
pub fn resolver_for(server: &ServerGuard) -> Resolver {
    resolver_with_config(server, ResolverConfig::default())
}

#[allow(dead_code)]
pub fn resolver_with_config(server: &ServerGuard, config: ResolverConfig) -> Resolver {
    let url = server.url();
    Resolver::with_services(
        config,
        LitCtxpService::with_base_url(&url),
        DoiService::with_base_url(&url),
        CrossrefService::with_base_url(&url),
    )
}

/// Config with retries disabled, for failure-path tests
#[allow(dead_code)]
pub fn no_retry_config() -> ResolverConfig {
    ResolverConfig {
        contact_email: None,
        max_retries: 0,
        fallback: FallbackConfig::default(),
    }
}
