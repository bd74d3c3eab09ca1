//! End-to-end crawl scenarios against a scripted archive stub.

use tempfile::TempDir;
use tgju_price_crawler::config::CrawlerConfig;
use tgju_price_crawler::crawler::{CrawlError, Crawler};
use tgju_price_crawler::fetcher::{FetcherError, RetryPolicy};
use tgju_price_crawler::output::dataset::read_rows;
use tgju_price_crawler::JalaliDate;

use crate::support::stub_server::{StubResponse, StubServer};

const QUOTE_BODY: &str = r#"{"id": 4338529, "item_id": 137203, "name": "price_dollar_rl",
 "price": 30170, "high": 30200, "low": 30100, "open": 30100,
 "time": "2014-03-20 00:00:00", "updated_at": "2014-03-20 12:00:00"}"#;

fn jd(s: &str) -> JalaliDate {
    s.parse().unwrap()
}

fn config(dir: &TempDir, base_url: String, start: &str, end: &str) -> CrawlerConfig {
    CrawlerConfig {
        starting_date: jd(start),
        ending_date: jd(end),
        base_url,
        retry: RetryPolicy::new(1, 0.0),
        ..CrawlerConfig::default().with_results_dir(dir.path())
    }
}

#[tokio::test]
async fn test_three_day_crawl_produces_three_rows() {
    let server = StubServer::start(vec![StubResponse::ok(QUOTE_BODY)]).await;
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, server.url(), "1393-01-01", "1393-01-03");

    let mut crawler = Crawler::new(cfg.clone()).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.days_completed, 3);
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.final_cursor, jd("1393-01-04"));

    let rows = read_rows(cfg.dataset_path()).unwrap();
    assert_eq!(rows.len(), 3);
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["1393-01-01", "1393-01-02", "1393-01-03"]);
    for row in &rows {
        assert!(!row.day.is_empty(), "weekday label missing for {}", row.date);
        assert_eq!(row.off, 0);
        assert_eq!(row.name.as_deref(), Some("price_dollar_rl"));
        assert_eq!(row.price.as_deref(), Some("30170"));
    }

    // The checkpoint is written at the start of each day and never after the
    // loop, so it still names the last processed day.
    let checkpoint = std::fs::read_to_string(cfg.checkpoint_path()).unwrap();
    assert_eq!(checkpoint.trim(), "1393-01-03");
}

#[tokio::test]
async fn test_unexpected_response_shape_becomes_empty_cells() {
    let server = StubServer::start(vec![StubResponse::ok(r#"{"surprise": true}"#)]).await;
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, server.url(), "1393-01-01", "1393-01-01");

    let mut crawler = Crawler::new(cfg.clone()).unwrap();
    crawler.run().await.unwrap();

    let rows = read_rows(cfg.dataset_path()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "1393-01-01");
    assert_eq!(rows[0].off, 0);
    assert_eq!(rows[0].price, None);
    assert_eq!(rows[0].id, None);
}

#[tokio::test]
async fn test_unretryable_status_aborts_on_first_day() {
    let server = StubServer::start(vec![StubResponse::status(404)]).await;
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, server.url(), "1393-01-01", "1393-01-03");

    let mut crawler = Crawler::new(cfg.clone()).unwrap();
    let err = crawler.run().await.unwrap_err();

    match err {
        CrawlError::Fetch(FetcherError::HttpError { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);

    // The checkpoint still names the failed day, so the next invocation
    // re-attempts it.
    let checkpoint = std::fs::read_to_string(cfg.checkpoint_path()).unwrap();
    assert_eq!(checkpoint.trim(), "1393-01-01");
}

#[tokio::test]
async fn test_exhausted_retries_abort_with_remote_unavailable() {
    let server = StubServer::start(vec![StubResponse::status(503)]).await;
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir, server.url(), "1393-01-01", "1393-01-02");
    cfg.retry = RetryPolicy::new(2, 0.0);

    let mut crawler = Crawler::new(cfg.clone()).unwrap();
    let err = crawler.run().await.unwrap_err();

    match err {
        CrawlError::Fetch(FetcherError::RemoteUnavailable { attempts, .. }) => {
            assert_eq!(attempts, 2)
        }
        other => panic!("expected RemoteUnavailable, got {other:?}"),
    }
    assert_eq!(server.hits(), 2);

    let checkpoint = std::fs::read_to_string(cfg.checkpoint_path()).unwrap();
    assert_eq!(checkpoint.trim(), "1393-01-01");
}

#[tokio::test]
async fn test_second_run_overwrites_dataset_from_checkpoint() {
    // The dataset accumulator always starts from an empty table, so rows
    // fetched by a first run are replaced by the rows of the second run.
    let server = StubServer::start(vec![StubResponse::ok(QUOTE_BODY)]).await;
    let dir = TempDir::new().unwrap();

    let cfg = config(&dir, server.url(), "1393-01-01", "1393-01-02");
    Crawler::new(cfg.clone()).unwrap().run().await.unwrap();
    assert_eq!(read_rows(cfg.dataset_path()).unwrap().len(), 2);

    let cfg2 = config(&dir, server.url(), "1393-01-01", "1393-01-03");
    Crawler::new(cfg2.clone()).unwrap().run().await.unwrap();

    // Second run resumed from the checkpoint (1393-01-02) and fetched two
    // days; only those rows are on disk afterwards.
    let rows = read_rows(cfg2.dataset_path()).unwrap();
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["1393-01-02", "1393-01-03"]);
}
