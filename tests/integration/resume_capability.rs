//! Resume behavior: the checkpoint names the next day to fetch.

use tempfile::TempDir;
use tgju_price_crawler::config::CrawlerConfig;
use tgju_price_crawler::crawler::Crawler;
use tgju_price_crawler::fetcher::RetryPolicy;
use tgju_price_crawler::resume::CheckpointStore;
use tgju_price_crawler::JalaliDate;

use crate::support::stub_server::{StubResponse, StubServer};

fn jd(s: &str) -> JalaliDate {
    s.parse().unwrap()
}

fn config(dir: &TempDir, base_url: String) -> CrawlerConfig {
    CrawlerConfig {
        starting_date: jd("1393-01-01"),
        ending_date: jd("1393-01-03"),
        base_url,
        retry: RetryPolicy::new(1, 0.0),
        ..CrawlerConfig::default().with_results_dir(dir.path())
    }
}

#[tokio::test]
async fn test_resume_fetches_checkpointed_day_first() {
    let server = StubServer::start(vec![StubResponse::ok("{}")]).await;
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, server.url());

    // A prior run left the checkpoint at day two.
    std::fs::create_dir_all(dir.path()).unwrap();
    CheckpointStore::new(cfg.checkpoint_path())
        .save(&jd("1393-01-02"))
        .unwrap();

    let mut crawler = Crawler::new(cfg).unwrap();
    let summary = crawler.run().await.unwrap();

    // Days two and three were fetched; day one was not repeated.
    assert_eq!(summary.days_completed, 2);
    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(
        requests[0].contains("year=1393") && requests[0].contains("month=1")
            && requests[0].contains("day=2"),
        "first request should target the checkpointed day: {}",
        requests[0]
    );
    assert!(requests[1].contains("day=3"), "{}", requests[1]);
}

#[tokio::test]
async fn test_missing_checkpoint_starts_from_configured_start() {
    let server = StubServer::start(vec![StubResponse::ok("{}")]).await;
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, server.url());

    let mut crawler = Crawler::new(cfg).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.days_completed, 3);
    let requests = server.requests();
    assert!(requests[0].contains("day=1"), "{}", requests[0]);
}

#[tokio::test]
async fn test_checkpoint_written_before_each_fetch() {
    // With a stub that fails on the second day, the checkpoint must already
    // name that day even though its fetch never succeeded.
    let server = StubServer::start(vec![
        StubResponse::ok("{}"),
        StubResponse::status(404),
    ])
    .await;
    let dir = TempDir::new().unwrap();
    let cfg = config(&dir, server.url());

    let mut crawler = Crawler::new(cfg.clone()).unwrap();
    assert!(crawler.run().await.is_err());

    let checkpoint = std::fs::read_to_string(cfg.checkpoint_path()).unwrap();
    assert_eq!(checkpoint.trim(), "1393-01-02");
}
