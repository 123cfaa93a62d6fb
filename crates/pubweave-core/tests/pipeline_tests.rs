//! End-to-end pipeline tests against mock metadata services

mod common;

use common::{csl_body, no_retry_config, resolver_for, resolver_with_config, search_body_single};
use mockito::{Matcher, Server};

use pubweave_core::{
    IdentifierKind, IdentifierOrigin, MemoryCache, ResolveError, ResolverConfig,
};

fn pubmed_query(id: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("format".into(), "csl".into()),
        Matcher::UrlEncoded("contenttype".into(), "json".into()),
        Matcher::UrlEncoded("id".into(), id.into()),
    ])
}

#[tokio::test]
async fn pubmed_url_block_resolves_via_exporter() {
    let mut server = Server::new_async().await;
    let exporter = server
        .mock("GET", "/lit/ctxp/v1/pubmed/")
        .match_query(pubmed_query("123456"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(csl_body("A resolved paper", "10.1234/x"))
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "\
* Imaging

John Doe et al, Some Title, Some Journal (2023)
https://pubmed.ncbi.nlm.nih.gov/123456
";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    exporter.assert_async().await;
    let citation = &bib.sections[0].citations[0];
    assert!(citation.is_resolved());
    let identifier = citation.identifier.as_ref().unwrap();
    assert_eq!(identifier.kind, IdentifierKind::Pmid);
    assert_eq!(identifier.value, "123456");
    assert_eq!(identifier.origin, IdentifierOrigin::UrlPattern);
    assert_eq!(
        citation.metadata.as_ref().unwrap().title.as_deref(),
        Some("A resolved paper")
    );
}

#[tokio::test]
async fn tagged_pmid_with_comment_line() {
    let mut server = Server::new_async().await;
    let exporter = server
        .mock("GET", "/lit/ctxp/v1/pubmed/")
        .match_query(pubmed_query("123123"))
        .with_status(200)
        .with_body(csl_body("Collaborative work", "10.1234/y"))
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nPMID: 123123\nin collaboration with ZYX\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    exporter.assert_async().await;
    let citation = &bib.sections[0].citations[0];
    assert!(citation.is_resolved());
    assert_eq!(citation.identifier.as_ref().unwrap().value, "123123");
    assert_eq!(
        citation.identifier.as_ref().unwrap().origin,
        IdentifierOrigin::ExplicitText
    );
    assert_eq!(citation.comment.as_deref(), Some("in collaboration with ZYX"));
}

#[tokio::test]
async fn doi_url_block_resolves_via_content_negotiation() {
    let mut server = Server::new_async().await;
    let negotiation = server
        .mock("GET", "/10.1234/example2")
        .match_header("accept", "application/vnd.citationstyles.csl+json")
        .with_status(200)
        .with_body(csl_body("Negotiated metadata", "10.1234/example2"))
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nhttps://doi.org/10.1234/example2\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    negotiation.assert_async().await;
    let citation = &bib.sections[0].citations[0];
    assert!(citation.is_resolved());
    let identifier = citation.identifier.as_ref().unwrap();
    assert_eq!(identifier.kind, IdentifierKind::Doi);
    assert_eq!(identifier.value, "10.1234/example2");
}

#[tokio::test]
async fn pmcid_block_routed_to_pmc_endpoint() {
    let mut server = Server::new_async().await;
    // The query carries the PMC prefix the exporter expects
    let exporter = server
        .mock("GET", "/lit/ctxp/v1/pmc/")
        .match_query(Matcher::UrlEncoded("id".into(), "PMC7654321".into()))
        .with_status(200)
        .with_body(csl_body("A PMC paper", "10.1234/pmc"))
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nSome paper. PMCID: PMC7654321\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    exporter.assert_async().await;
    assert!(bib.sections[0].citations[0].is_resolved());
}

#[tokio::test]
async fn free_text_block_resolved_through_fallback() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/works")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "query.bibliographic".into(),
                "Doe J, An unlabeled paper, Journal of Things (2022)".into(),
            ),
            Matcher::UrlEncoded("rows".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(search_body_single("10.5555/found", 95.0))
        .create_async()
        .await;
    let negotiation = server
        .mock("GET", "/10.5555/found")
        .with_status(200)
        .with_body(csl_body("Canonical metadata, not the search stub", "10.5555/found"))
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nDoe J, An unlabeled paper, Journal of Things (2022)\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    search.assert_async().await;
    negotiation.assert_async().await;
    let citation = &bib.sections[0].citations[0];
    assert!(citation.is_resolved());
    let identifier = citation.identifier.as_ref().unwrap();
    assert_eq!(identifier.kind, IdentifierKind::Doi);
    assert_eq!(identifier.value, "10.5555/found");
    assert_eq!(identifier.origin, IdentifierOrigin::BibliographicQuery);
    // Metadata comes from the identifier-keyed requery, not the search result
    assert_eq!(
        citation.metadata.as_ref().unwrap().title.as_deref(),
        Some("Canonical metadata, not the search stub")
    );
}

#[tokio::test]
async fn malformed_block_aborts_before_any_network_call() {
    let mut server = Server::new_async().await;
    let any_request = server
        .mock("GET", Matcher::Regex(".*".into()))
        .expect(0)
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nPMID: 123456\nline two\nline three\nline four\n";
    let err = resolver.resolve_text(&cache, input).await.unwrap_err();

    assert!(matches!(err, ResolveError::Parse(_)));
    any_request.assert_async().await;
    assert!(cache.is_empty());
}

#[tokio::test]
async fn pmid_selected_over_doi() {
    let mut server = Server::new_async().await;
    let exporter = server
        .mock("GET", "/lit/ctxp/v1/pubmed/")
        .match_query(pubmed_query("111"))
        .with_status(200)
        .with_body(csl_body("Chosen by priority", "10.1234/zzz"))
        .create_async()
        .await;
    let negotiation = server
        .mock("GET", "/10.1234/zzz")
        .expect(0)
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nSome paper. PMID: 111\nhttps://doi.org/10.1234/zzz\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    exporter.assert_async().await;
    negotiation.assert_async().await;
    let identifier = bib.sections[0].citations[0].identifier.as_ref().unwrap();
    assert_eq!(identifier.kind, IdentifierKind::Pmid);
    assert_eq!(identifier.value, "111");
}

#[tokio::test]
async fn repeated_identifier_fetched_once_per_run() {
    let mut server = Server::new_async().await;
    let exporter = server
        .mock("GET", "/lit/ctxp/v1/pubmed/")
        .match_query(pubmed_query("777"))
        .with_status(200)
        .with_body(csl_body("Cached once", "10.1234/c"))
        .expect(1)
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* A\n\nPMID: 777\n\n* B\n\nSame paper again. PMID: 777\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    exporter.assert_async().await;
    let first = &bib.sections[0].citations[0];
    let second = &bib.sections[1].citations[0];
    assert!(first.is_resolved());
    assert!(second.is_resolved());
    assert_eq!(first.metadata, second.metadata);
}

#[tokio::test]
async fn fetch_failure_leaves_citation_unresolved_and_run_continues() {
    let mut server = Server::new_async().await;
    let missing = server
        .mock("GET", "/10.9999/missing")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let exporter = server
        .mock("GET", "/lit/ctxp/v1/pubmed/")
        .match_query(pubmed_query("222"))
        .with_status(200)
        .with_body(csl_body("Still resolved", "10.1234/ok"))
        .create_async()
        .await;

    let resolver = resolver_with_config(&server, no_retry_config());
    let cache = MemoryCache::new();
    let input = "\
* Projects

https://doi.org/10.9999/missing

Second paper. PMID: 222
";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    missing.assert_async().await;
    exporter.assert_async().await;

    let failed = &bib.sections[0].citations[0];
    assert!(!failed.is_resolved());
    assert!(failed.metadata.is_none());
    assert!(failed.failure.as_deref().unwrap().contains("404"));
    // Raw text is the fallback display for unresolved entries
    assert_eq!(failed.display_text(), "https://doi.org/10.9999/missing");

    assert!(bib.sections[0].citations[1].is_resolved());
}

#[tokio::test]
async fn transient_server_error_retried_before_giving_up() {
    let mut server = Server::new_async().await;
    // max_retries = 1: the initial attempt plus exactly one retry
    let flaky = server
        .mock("GET", "/10.1234/flaky")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let config = ResolverConfig {
        max_retries: 1,
        ..ResolverConfig::default()
    };
    let resolver = resolver_with_config(&server, config);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nhttps://doi.org/10.1234/flaky\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    flaky.assert_async().await;
    let citation = &bib.sections[0].citations[0];
    assert!(!citation.is_resolved());
    assert!(citation.failure.as_deref().unwrap().contains("500"));
}

#[tokio::test]
async fn empty_search_result_is_unresolved_without_requery() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"message": {"items": []}}"#)
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nNobody ever wrote this paper (1890)\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    search.assert_async().await;
    let citation = &bib.sections[0].citations[0];
    assert!(!citation.is_resolved());
    assert!(citation
        .failure
        .as_deref()
        .unwrap()
        .contains("no acceptable match"));
}

#[tokio::test]
async fn ambiguous_search_result_is_unresolved_without_requery() {
    let mut server = Server::new_async().await;
    let body = r#"{
        "message": {
            "items": [
                {"DOI": "10.1/a", "title": ["Same words"], "type": "journal-article",
                 "score": 90.0, "issued": {"date-parts": [[2022]]}},
                {"DOI": "10.1/b", "title": ["Same words"], "type": "journal-article",
                 "score": 90.0, "issued": {"date-parts": [[2022]]}}
            ]
        }
    }"#;
    let search = server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;
    let any_doi = server
        .mock("GET", Matcher::Regex("^/10\\.1/.*".into()))
        .expect(0)
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "* Projects\n\nSame words\n";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    search.assert_async().await;
    any_doi.assert_async().await;
    let citation = &bib.sections[0].citations[0];
    assert!(!citation.is_resolved());
    assert!(citation.failure.as_deref().unwrap().contains("ambiguous"));
}

#[tokio::test]
async fn output_preserves_section_and_block_order() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/lit/ctxp/v1/pubmed/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(csl_body("Fetched", "10.1234/any"))
        .create_async()
        .await;
    server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"message": {"items": []}}"#)
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let cache = MemoryCache::new();
    let input = "\
* First

alpha. PMID: 1

free text nobody can resolve

* Second

beta. PMID: 2
";
    let bib = resolver.resolve_text(&cache, input).await.unwrap();

    assert_eq!(bib.len(), 3);
    assert_eq!(bib.sections[0].name, "First");
    assert_eq!(bib.sections[1].name, "Second");
    assert_eq!(bib.sections[0].citations[0].citation_text, "alpha. PMID: 1");
    assert_eq!(
        bib.sections[0].citations[1].citation_text,
        "free text nobody can resolve"
    );
    assert!(!bib.sections[0].citations[1].is_resolved());
    assert_eq!(bib.sections[1].citations[0].citation_text, "beta. PMID: 2");

    // The machine-readable dump carries the same structure
    let json = bib.to_json().unwrap();
    assert!(json.contains("First"));
    assert!(json.contains("free text nobody can resolve"));
}
