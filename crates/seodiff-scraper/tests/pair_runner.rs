//! Integration tests for `PairRunner` against a `wiremock` server.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seodiff_core::{ConfigError, SignalGroups, SiteVariant, UrlPair};
use seodiff_scraper::{NoDelay, Pacer, PageClient, PairRunner};

fn test_client(timeout_secs: u64) -> PageClient {
    PageClient::new(timeout_secs, "seodiff-test/0.1").expect("failed to build test PageClient")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn site(server: &MockServer, prod: &[&str], stage: &[&str], seo: bool) -> SiteVariant {
    SiteVariant {
        name: "main".to_string(),
        sheet_name: "MAIN".to_string(),
        report_title: "MAIN SEO page inspector".to_string(),
        seo,
        prod_urls: prod.iter().map(|p| format!("{}{p}", server.uri())).collect(),
        stage_urls: stage.iter().map(|p| format!("{}{p}", server.uri())).collect(),
    }
}

/// Counts how many times the runner paced.
#[derive(Clone, Default)]
struct CountingPacer {
    calls: Arc<AtomicUsize>,
}

impl Pacer for CountingPacer {
    fn pace(&self) -> impl Future<Output = ()> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::ready(())
    }
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_site_compares_pairs_in_order() {
    let server = MockServer::start().await;
    serve(&server, "/prod/a", "<title>A</title><h1>A</h1><h2>x</h2>").await;
    serve(&server, "/stage/a", "<title>A</title><h1>A</h1>").await;
    serve(&server, "/prod/b", "<h1>B</h1>").await;
    serve(&server, "/stage/b", "<h1>B</h1>").await;

    let site = site(&server, &["/prod/a", "/prod/b"], &["/stage/a", "/stage/b"], true);
    let runner = PairRunner::new(test_client(5), NoDelay);
    let results = runner.run_site(&site).await.expect("run_site");

    assert_eq!(results.len(), 2);
    assert!(results[0].prod_url.ends_with("/prod/a"));
    assert!(results[0].stage_url.ends_with("/stage/a"));
    assert!(results[1].prod_url.ends_with("/prod/b"));

    assert_eq!(results[0].diffs.heading(2), -1);
    assert_eq!(results[0].diffs.total, -1);
    assert_eq!(results[0].diffs.title, Some(0));
    assert!(results[0].diffs.has_any());
    assert!(!results[1].diffs.has_any());
    assert!(results.iter().all(|r| !r.has_error()));
}

#[tokio::test]
async fn headings_only_site_has_no_seo_counts() {
    let server = MockServer::start().await;
    serve(&server, "/p", "<title>P</title><h1>P</h1>").await;
    serve(&server, "/s", "<h1>S</h1>").await;

    let site = site(&server, &["/p"], &["/s"], false);
    let results = PairRunner::new(test_client(5), NoDelay)
        .run_site(&site)
        .await
        .expect("run_site");

    assert_eq!(results.len(), 1);
    assert!(results[0].prod.seo.is_none());
    assert!(results[0].diffs.title.is_none());
    assert!(!results[0].diffs.has_any());
}

#[tokio::test]
async fn empty_site_produces_no_results() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pacer = CountingPacer::default();
    let site = site(&server, &[], &[], true);
    let results = PairRunner::new(test_client(5), pacer.clone())
        .run_site(&site)
        .await
        .expect("run_site");

    assert!(results.is_empty());
    assert_eq!(pacer.calls.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Failure handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mismatched_lists_fail_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(html("<h1>x</h1>"))
        .expect(0)
        .mount(&server)
        .await;

    let site = site(&server, &["/a", "/b"], &["/a"], true);
    let err = PairRunner::new(test_client(5), NoDelay)
        .run_site(&site)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ConfigError::PairCountMismatch { prod: 2, stage: 1, .. }),
        "expected PairCountMismatch, got: {err:?}"
    );
}

#[tokio::test]
async fn prod_timeout_is_recorded_and_stage_still_counted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prod"))
        .respond_with(html("<h1>late</h1>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    serve(&server, "/stage", "<title>T</title><h1>One</h1><h1>Two</h1>").await;

    let site = site(&server, &["/prod"], &["/stage"], true);
    let results = PairRunner::new(test_client(1), NoDelay)
        .run_site(&site)
        .await
        .expect("run_site");

    let r = &results[0];
    assert!(r.prod_error.as_deref().is_some_and(|e| e.contains("timed out")));
    assert!(r.stage_error.is_none());
    assert_eq!(r.prod.total, 0);
    assert_eq!(r.stage.heading(1), 2);
    assert_eq!(r.diffs.heading(1), 2);
    assert_eq!(r.diffs.title, Some(1));
    assert!(!r.diffs.observed);
    assert!(r.has_error());
}

#[tokio::test]
async fn failed_pair_does_not_stop_later_pairs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/prod/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    serve(&server, "/stage/down", "<h1>x</h1>").await;
    serve(&server, "/prod/up", "<h1>x</h1>").await;
    serve(&server, "/stage/up", "<h1>x</h1>").await;

    let site = site(
        &server,
        &["/prod/down", "/prod/up"],
        &["/stage/down", "/stage/up"],
        true,
    );
    let results = PairRunner::new(test_client(5), NoDelay)
        .run_site(&site)
        .await
        .expect("run_site");

    assert_eq!(results.len(), 2);
    assert!(results[0].prod_error.as_deref().is_some_and(|e| e.contains("502")));
    assert!(!results[1].has_error());
}

// ---------------------------------------------------------------------------
// Pacing and side concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pacer_runs_once_per_pair() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<h1>x</h1>"))
        .expect(6)
        .mount(&server)
        .await;

    let pacer = CountingPacer::default();
    let pairs = vec![
        UrlPair::new(format!("{}/1", server.uri()), format!("{}/1s", server.uri())),
        UrlPair::new(format!("{}/2", server.uri()), format!("{}/2s", server.uri())),
        UrlPair::new(format!("{}/3", server.uri()), format!("{}/3s", server.uri())),
    ];
    let results = PairRunner::new(test_client(5), pacer.clone())
        .run(&pairs, SignalGroups::ALL)
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(pacer.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn concurrent_sides_produce_same_results_as_sequential() {
    let server = MockServer::start().await;
    serve(&server, "/p", "<title>P</title><h1>a</h1><h3>b</h3>").await;
    serve(&server, "/s", "<title></title><h1>a</h1>").await;

    let pairs = vec![UrlPair::new(
        format!("{}/p", server.uri()),
        format!("{}/s", server.uri()),
    )];

    let sequential = PairRunner::new(test_client(5), NoDelay)
        .run(&pairs, SignalGroups::ALL)
        .await;
    let concurrent = PairRunner::new(test_client(5), NoDelay)
        .with_concurrent_sides(true)
        .run(&pairs, SignalGroups::ALL)
        .await;

    assert_eq!(sequential[0].prod, concurrent[0].prod);
    assert_eq!(sequential[0].stage, concurrent[0].stage);
    assert_eq!(sequential[0].diffs, concurrent[0].diffs);
    assert_eq!(concurrent[0].diffs.title, Some(-1));
    assert_eq!(concurrent[0].diffs.heading(3), -1);
}
