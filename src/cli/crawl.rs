//! Crawl command implementation

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::CliError;
use crate::config::{
    CrawlerConfig, OutputFormat, DEFAULT_BASE_URL, DEFAULT_MAX_ENDING_DATE,
    DEFAULT_MIN_STARTING_DATE, DEFAULT_SERIES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::crawler::Crawler;
use crate::fetcher::retry::{RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_RETRY_TIMES};
use crate::jalali::JalaliDate;

/// tgju price crawler CLI
#[derive(Parser, Debug)]
#[command(name = "tgju-price-crawler")]
#[command(about = "Crawl daily currency prices from the tgju.org archive", long_about = None)]
#[command(version)]
pub struct Cli {
    /// First day to crawl (Jalali YYYY-MM-DD); resumes from the checkpoint
    /// when one exists
    #[arg(long, default_value = DEFAULT_MIN_STARTING_DATE)]
    pub start: JalaliDate,

    /// Last day to crawl (Jalali YYYY-MM-DD, inclusive)
    #[arg(long, default_value = DEFAULT_MAX_ENDING_DATE)]
    pub end: JalaliDate,

    /// Earliest day the archive serves
    #[arg(long, default_value = DEFAULT_MIN_STARTING_DATE)]
    pub min_starting_date: JalaliDate,

    /// Latest day the archive serves
    #[arg(long, default_value = DEFAULT_MAX_ENDING_DATE)]
    pub max_ending_date: JalaliDate,

    /// Directory for the dataset and checkpoint files
    #[arg(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Checkpoint file name inside the results directory
    #[arg(long, default_value = "last_crawled_date.txt")]
    pub checkpoint_file: String,

    /// Dataset file name inside the results directory
    #[arg(long, default_value = "all_data.csv")]
    pub dataset_file: String,

    /// Archive base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Archive series name to fetch
    #[arg(long, default_value = DEFAULT_SERIES)]
    pub series: String,

    /// User-agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Attempts per request, the first one included
    #[arg(long, default_value_t = DEFAULT_RETRY_TIMES)]
    pub retry_times: u32,

    /// Backoff factor in seconds for the retry delay
    #[arg(long, default_value_t = DEFAULT_BACKOFF_FACTOR)]
    pub backoff_factor: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub output_format: OutputFormat,
}

impl Cli {
    /// Translate the parsed arguments into a crawler configuration.
    pub fn to_config(&self) -> CrawlerConfig {
        CrawlerConfig {
            starting_date: self.start,
            ending_date: self.end,
            min_starting_date: self.min_starting_date,
            max_ending_date: self.max_ending_date,
            results_dir: self.results_dir.clone(),
            checkpoint_file: self.checkpoint_file.clone(),
            dataset_file: self.dataset_file.clone(),
            base_url: self.base_url.clone(),
            series: self.series.clone(),
            user_agent: self.user_agent.clone(),
            retry: RetryPolicy::new(self.retry_times, self.backoff_factor),
            timeout: Duration::from_secs(self.timeout),
            output_format: self.output_format,
        }
    }

    /// Run the crawl described by the arguments.
    pub async fn execute(&self) -> Result<(), CliError> {
        let config = self.to_config();
        let mut crawler = Crawler::new(config)?;
        let summary = crawler.run().await?;

        info!(
            days = summary.days_completed,
            rows = summary.rows,
            final_cursor = %summary.final_cursor,
            "crawl finished"
        );
        Ok(())
    }
}
