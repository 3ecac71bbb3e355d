//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the marketplace and run the
//! blocking crawl session end-to-end on a blocking thread.

use classifind::config::{Config, CrawlConfig, OutputConfig, SiteConfig, UserAgentConfig};
use classifind::crawler::{CrawlParams, CrawlSession};
use classifind::fetcher::HttpFetcher;
use classifind::output::CrawlReport;
use classifind::site::AvitoAdapter;
use classifind::storage::{ItemStore, SqliteItemStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, categories: &[&str], dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            location: "moskva".to_string(),
        },
        crawl: CrawlConfig {
            queries: vec![vec!["bike".to_string()]],
            categories: categories.iter().map(|c| c.to_string()).collect(),
            max_pages: 5,
            min_price: 0,
            max_price: 0,
            page_delay: 0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: dir.join("items.db").to_string_lossy().into_owned(),
            photo_dir: dir.join("photo").to_string_lossy().into_owned(),
        },
    }
}

/// One listing block; `photo` is a protocol-relative image URL
fn listing(id: u32, photo: Option<&str>) -> String {
    let photo = photo
        .map(|src| {
            format!(
                r#"<div class="b-photo"><a href="/moskva/sport/x_{id}"><img src="{src}"></a></div>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="item item_table">
            {photo}
            <div class="description">
                <h3 class="title"><a href="/moskva/sport/x_{id}">Bike {id}</a></h3>
                <div class="about">{id}00 руб.</div>
                <div class="data"><p>Велосипеды</p><p>м. Сокол</p><div class="date">28 окт. 10:00</div></div>
            </div>
        </div>"#
    )
}

fn results_page(listings: &[String]) -> String {
    format!(
        "<html><body><div class=\"catalog\">{}</div></body></html>",
        listings.concat()
    )
}

async fn mount_page(server: &MockServer, category: &str, page: u32, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/moskva/{}", category)))
        .and(query_param("q", "bike"))
        .and(query_param("p", page.to_string()))
        .respond_with(template)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn page_requests(server: &MockServer, category: &str) -> usize {
    let wanted = format!("/moskva/{}", category);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == wanted)
        .count()
}

struct CrawlOutcome {
    new_hashes: Vec<String>,
    inserted: Vec<String>,
    report: CrawlReport,
}

/// Runs a full session (load, refresh, save) the way the CLI does
async fn run_crawl(config: Config) -> CrawlOutcome {
    tokio::task::spawn_blocking(move || {
        let adapter = AvitoAdapter::new(&config.site).expect("valid base url");
        let fetcher = HttpFetcher::new(&config.user_agent).expect("http client");
        let params = CrawlParams::from_config(&config);
        std::fs::create_dir_all(&params.photo_dir).expect("photo dir");

        let mut store =
            SqliteItemStore::new(Path::new(&config.output.database_path)).expect("open db");
        let mut session = CrawlSession::new(adapter, fetcher, params);
        session.load(&store).expect("load");

        let new_hashes = session.refresh();
        let inserted = session.save(&mut store, None).expect("save");

        CrawlOutcome {
            new_hashes,
            inserted,
            report: session.report().clone(),
        }
    })
    .await
    .expect("crawl thread panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_crawl_stops_when_page_has_nothing_new() {
    let server = MockServer::start().await;
    let host = server.uri().trim_start_matches("http:").to_string();
    let dir = TempDir::new().unwrap();

    let photo = format!("{}/140x105/101.jpg", host);
    let first = results_page(&[
        listing(1, Some(&photo)),
        listing(2, None),
        listing(3, None),
    ]);
    mount_page(&server, "sport", 1, html(first.clone())).await;
    mount_page(&server, "sport", 2, html(first)).await;
    mount_page(
        &server,
        "sport",
        3,
        html(results_page(&[listing(4, None)])),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/140x105/101.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xff\xd8\xff\xe0".to_vec()))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &["sport"], dir.path());
    let outcome = run_crawl(config).await;

    assert_eq!(outcome.new_hashes.len(), 3);
    assert_eq!(page_requests(&server, "sport").await, 2);
    let mut inserted = outcome.inserted.clone();
    let mut discovered = outcome.new_hashes.clone();
    inserted.sort();
    discovered.sort();
    assert_eq!(inserted, discovered);

    let photo_path: PathBuf = dir
        .path()
        .join("photo")
        .join(&outcome.new_hashes[0])
        .join("101.jpg");
    assert_eq!(std::fs::read(photo_path).unwrap(), b"\xff\xd8\xff\xe0");
    assert_eq!(outcome.report.photos_downloaded, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_session_finds_nothing_new() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let page = results_page(&[listing(1, None), listing(2, None)]);
    mount_page(&server, "sport", 1, html(page)).await;

    let first = run_crawl(create_test_config(&server.uri(), &["sport"], dir.path())).await;
    assert_eq!(first.new_hashes.len(), 2);
    assert_eq!(first.inserted.len(), 2);

    let second = run_crawl(create_test_config(&server.uri(), &["sport"], dir.path())).await;
    assert!(second.new_hashes.is_empty());
    assert!(second.inserted.is_empty());

    let store = SqliteItemStore::new(&dir.path().join("items.db")).unwrap();
    assert_eq!(store.count().unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_skips_to_next_category() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "sport", 1, ResponseTemplate::new(503)).await;
    mount_page(
        &server,
        "auto",
        1,
        html(results_page(&[listing(7, None)])),
    )
    .await;

    let config = create_test_config(&server.uri(), &["sport", "auto"], dir.path());
    let outcome = run_crawl(config).await;

    assert_eq!(outcome.new_hashes.len(), 1);
    assert_eq!(page_requests(&server, "sport").await, 1);
    assert_eq!(outcome.report.pages_failed, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_listing_does_not_abort_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let broken = listing(2, None).replace(r#"class="description""#, r#"class="teaser""#);
    let page = results_page(&[listing(1, None), broken, listing(3, None)]);
    mount_page(&server, "sport", 1, html(page)).await;

    let config = create_test_config(&server.uri(), &["sport"], dir.path());
    let outcome = run_crawl(config).await;

    assert_eq!(outcome.new_hashes.len(), 2);
    assert_eq!(outcome.report.parse_errors, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_site_yields_no_items() {
    let dir = TempDir::new().unwrap();

    // Grab a free port, then release it so nothing is listening there
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let config = create_test_config(&format!("http://127.0.0.1:{}", port), &["sport"], dir.path());
    let outcome = run_crawl(config).await;

    assert!(outcome.new_hashes.is_empty());
    assert!(outcome.inserted.is_empty());
    assert_eq!(outcome.report.pages_failed, 0);
    assert_eq!(outcome.report.pages_fetched, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_windows_1251_page_is_decoded() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let page = results_page(&[listing(1, None).replace("Bike 1", "Велосипед")]);
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(&page);
    mount_page(
        &server,
        "sport",
        1,
        ResponseTemplate::new(200)
            .set_body_raw(bytes.into_owned(), "text/html; charset=windows-1251"),
    )
    .await;

    let config = create_test_config(&server.uri(), &["sport"], dir.path());
    let outcome = run_crawl(config).await;
    assert_eq!(outcome.new_hashes.len(), 1);

    let store = SqliteItemStore::new(&dir.path().join("items.db")).unwrap();
    let items = store.load_all().unwrap();
    let item = &items[&outcome.new_hashes[0]];
    assert_eq!(item.title, "велосипед");
    assert_eq!(item.category, "велосипеды");
    assert_eq!(item.location, "м. сокол");
    assert_eq!(item.date, "28 10 10:00");
}
