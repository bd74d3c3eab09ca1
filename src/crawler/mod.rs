//! Fetch loop orchestration
//!
//! Drives the day-by-day iteration: validate the range, load the checkpoint
//! and dataset, then for each remaining day persist the checkpoint, fetch
//! the archive record, stamp and append it, flush the dataset, and advance.
//! The checkpoint is written *before* the fetch so that a crash mid-fetch
//! re-fetches the same day on restart instead of skipping it.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::CrawlerConfig;
use crate::fetcher::{ArchiveHttpClient, FetcherError};
use crate::jalali::JalaliDate;
use crate::output::{Dataset, OutputError};
use crate::range::{DateRange, RangeError};
use crate::resume::CheckpointStore;
use crate::PriceRecord;

/// Crawl errors
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Range validation failure; no I/O has happened yet
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Unrecovered fetch failure; the run aborts on the first bad day
    #[error(transparent)]
    Fetch(#[from] FetcherError),

    /// Dataset persistence failure
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Results directory could not be created
    #[error("cannot create results directory: {0}")]
    ResultsDir(String),
}

/// Outcome of a completed crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Days fetched during this run
    pub days_completed: u64,
    /// Rows in the in-memory dataset at the end of the run
    pub rows: usize,
    /// Day the cursor ended on (one past the last fetched day)
    pub final_cursor: JalaliDate,
}

/// Sequential day-by-day crawler.
pub struct Crawler {
    config: CrawlerConfig,
    client: ArchiveHttpClient,
    checkpoint: CheckpointStore,
    dataset: Dataset,
}

impl Crawler {
    /// Build a crawler from its configuration.
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        let client = ArchiveHttpClient::new(
            config.base_url.clone(),
            config.series.clone(),
            &config.user_agent,
            config.timeout,
            config.retry,
        )?;
        let checkpoint = CheckpointStore::new(config.checkpoint_path());

        Ok(Self {
            config,
            client,
            checkpoint,
            dataset: Dataset::new(),
        })
    }

    /// Run the crawl to completion.
    ///
    /// Range validation happens before any file or network I/O; a violation
    /// aborts the process-level run. Fetch errors that survive the retry
    /// policy abort the loop with the checkpoint still naming the failed
    /// day, so the next invocation re-attempts it.
    pub async fn run(&mut self) -> Result<CrawlSummary, CrawlError> {
        let range = DateRange::normalize(
            self.config.starting_date,
            self.config.ending_date,
            self.config.min_starting_date,
            self.config.max_ending_date,
        )?;

        std::fs::create_dir_all(&self.config.results_dir)
            .map_err(|e| CrawlError::ResultsDir(e.to_string()))?;

        let mut cursor = self.checkpoint.load(range.start());
        self.dataset.load_existing(self.config.dataset_path());

        let end = range.end();
        let total = (cursor.days_until(&end) + 1).max(0) as u64;
        let dataset_path = self.config.dataset_path();

        info!(
            start = %range.start(),
            %end,
            %cursor,
            total,
            series = %self.config.series,
            "starting crawl"
        );

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut completed: u64 = 0;
        while cursor <= end {
            info!("crawling date {cursor}");
            bar.set_message(cursor.to_string());

            // Resume point first: a crash from here on re-fetches this day.
            if let Err(e) = self.checkpoint.save(&cursor) {
                warn!(error = %e, "checkpoint not saved; continuing without resume point");
            }

            let response = self.client.fetch(&cursor).await?;
            let record = PriceRecord::from_response(&cursor, &response);
            self.dataset.append(record);
            self.dataset.flush(&dataset_path)?;

            cursor = cursor.succ();
            completed += 1;
            bar.inc(1);
            info!("{completed}/{total} done");
        }
        bar.finish_and_clear();

        // Duplicate rows are counted but the deduplicated table is never
        // written back; the on-disk dataset keeps every fetched row.
        let deduped = self.dataset.dedupe();
        debug!(
            rows = self.dataset.len(),
            unique = deduped.len(),
            "deduplication computed, not persisted"
        );

        Ok(CrawlSummary {
            days_completed: completed,
            rows: self.dataset.len(),
            final_cursor: cursor,
        })
    }

    /// The dataset accumulated so far.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}
