//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use link_mapper::config::Config;
use link_mapper::crawler::{
    run_crawl, Coordinator, FetchError, HttpTransport, PageRecord, Transport,
};
use link_mapper::output::{load_artifact, JsonOutputHandler};
use link_mapper::CrawlState;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that follows links on the mock server only
fn create_test_config(seed: String, max_pages: usize) -> Config {
    let mut config = Config::default();
    config.seed = seed;
    config.crawler.max_pages = max_pages;
    config.crawler.concurrency = 5;
    config.crawler.inter_round_delay_ms = 10;
    config.fetch.initial_backoff_ms = 10;
    config.fetch.timeout_secs = 5;
    config.filter.allow = vec!["127.0.0.1".to_string()];
    config.filter.deny = vec!["/private".to_string()];
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn crawl_to_artifact(config: Config, dir: &TempDir) -> (link_mapper::CrawlReport, Vec<PageRecord>) {
    let artifact = dir.path().join("pageLinkMapping.json");
    let handler = JsonOutputHandler::new(&artifact);
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let report = run_crawl(coordinator, &handler).await.expect("Crawl failed");
    let records = load_artifact(&artifact).expect("Failed to load artifact");
    (report, records)
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r##"<a href="/page1">Page 1</a>
            <a href="page2">Page 2</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">Script</a>
            <a href="https://external.example/x">External</a>
            <a href="/private/admin">Private</a>"##,
    )
    .await;
    mount_page(&mock_server, "/page1", r#"<a href="/">Home</a><a href="/page2">2</a>"#).await;
    mount_page(&mock_server, "/page2", "No links here").await;

    Mock::given(method("GET"))
        .and(path("/private/admin"))
        .respond_with(html_page("secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(format!("{}/", base_url), 100);
    let (report, records) = crawl_to_artifact(config, &dir).await;

    assert_eq!(report.stop_reason, CrawlState::Drained);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.records, records);

    // page2 has no links, so only two records
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].page, format!("{}/", base_url));
    assert_eq!(
        records[0].links,
        vec![
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            "https://external.example/x".to_string(),
            format!("{}/private/admin", base_url),
        ]
    );
    assert_eq!(records[1].page, format!("{}/page1", base_url));
}

#[tokio::test]
async fn test_retry_recovers_from_transient_errors() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/flaky">Flaky</a>"#).await;

    // First two attempts fail, the third succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/flaky", r#"<a href="/">Home</a>"#).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(format!("{}/", base_url), 100);
    let (report, records) = crawl_to_artifact(config, &dir).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.pages_dropped, 0);
    assert!(records
        .iter()
        .any(|r| r.page == format!("{}/flaky", base_url)));
}

#[tokio::test]
async fn test_persistent_failure_drops_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/down">Down</a><a href="/up">Up</a>"#,
    )
    .await;
    mount_page(&mock_server, "/up", r#"<a href="/down">Down again</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(format!("{}/", base_url), 100);
    let (report, records) = crawl_to_artifact(config, &dir).await;

    assert_eq!(report.pages_visited, 2);
    assert!(report.pages_dropped >= 1);
    assert!(records.iter().all(|r| r.page != format!("{}/down", base_url)));

    // Three attempts per withdrawal of /down
    let requests = mock_server.received_requests().await.unwrap();
    let down_requests = requests.iter().filter(|r| r.url.path() == "/down").count();
    assert_eq!(down_requests % 3, 0);
    assert!(down_requests >= 3);
}

#[tokio::test]
async fn test_page_budget_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut links = String::new();
    for i in 0..10 {
        links.push_str(&format!(r#"<a href="/p{}">P{}</a>"#, i, i));
    }
    mount_page(&mock_server, "/", &links).await;
    for i in 0..10 {
        mount_page(&mock_server, &format!("/p{}", i), r#"<a href="/">Home</a>"#).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(format!("{}/", base_url), 4);
    let (report, records) = crawl_to_artifact(config, &dir).await;

    assert_eq!(report.stop_reason, CrawlState::BudgetReached);
    assert_eq!(report.pages_visited, 4);
    assert_eq!(records.len(), 4);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_redirects_followed_within_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/hop"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hop"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/final", r#"<a href="/next">Next</a>"#).await;
    mount_page(&mock_server, "/next", "").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(format!("{}/", base_url), 100);
    let (report, records) = crawl_to_artifact(config, &dir).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(records.len(), 1);
    // The record keeps the URL that was requested
    assert_eq!(records[0].page, format!("{}/", base_url));
}

#[tokio::test]
async fn test_redirect_chain_over_limit_fails() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for i in 0..8 {
        Mock::given(method("GET"))
            .and(path(format!("/r{}", i)))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", format!("/r{}", i + 1).as_str()),
            )
            .mount(&mock_server)
            .await;
    }
    mount_page(&mock_server, "/r8", "end").await;

    let mut config = Config::default();
    config.fetch.max_redirects = 5;
    let transport = HttpTransport::from_config(&config.fetch).unwrap();

    let result = transport.get(&format!("{}/r0", base_url)).await;
    assert_eq!(result, Err(FetchError::RedirectLimit));
}

#[tokio::test]
async fn test_http_transport_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "hello").await;

    let transport = HttpTransport::from_config(&Config::default().fetch).unwrap();

    let missing = transport
        .get(&format!("{}/missing", mock_server.uri()))
        .await;
    assert_eq!(missing, Err(FetchError::Status(404)));

    let ok = transport.get(&format!("{}/ok", mock_server.uri())).await.unwrap();
    assert!(ok.contains("hello"));
}

#[tokio::test]
async fn test_artifact_write_failure_does_not_fail_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", "").await;

    let dir = TempDir::new().unwrap();
    let unwritable = dir.path().join("no-such-dir").join("out.json");
    let handler = JsonOutputHandler::new(&unwritable);

    let config = create_test_config(format!("{}/", base_url), 100);
    let coordinator = Coordinator::new(&config).unwrap();
    let report = run_crawl(coordinator, &handler).await.expect("Crawl should still succeed");

    assert_eq!(report.records.len(), 1);
    assert!(!unwritable.exists());
}

#[tokio::test]
async fn test_artifact_overwritten_between_runs() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/">Home</a>"#).await;

    let dir = TempDir::new().unwrap();
    let (_, first) = crawl_to_artifact(create_test_config(format!("{}/", base_url), 100), &dir).await;
    assert_eq!(first.len(), 2);

    let (_, second) = crawl_to_artifact(create_test_config(format!("{}/", base_url), 1), &dir).await;
    assert_eq!(second.len(), 1);
}
