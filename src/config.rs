//! Crawler configuration
//!
//! A single immutable struct carries every tunable; components receive it (or
//! pieces of it) at construction time and nothing mutates it afterwards.

use crate::fetcher::retry::RetryPolicy;
use crate::jalali::JalaliDate;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default archive base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.tgju.org/";

/// Default price series fetched from the archive.
pub const DEFAULT_SERIES: &str = "price_dollar_rl";

/// Default user-agent header sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:98.0) Gecko/20100101 Firefox/98.0";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Earliest day the archive serves for the supported series.
pub const DEFAULT_MIN_STARTING_DATE: &str = "1393-01-01";

/// Latest day the archive serves for the supported series.
pub const DEFAULT_MAX_ENDING_DATE: &str = "1400-12-29";

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Comma-separated values
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Immutable configuration for a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// First day to crawl when no checkpoint exists.
    pub starting_date: JalaliDate,
    /// Last day to crawl (inclusive).
    pub ending_date: JalaliDate,
    /// Absolute lower bound accepted for `starting_date`.
    pub min_starting_date: JalaliDate,
    /// Absolute upper bound accepted for `ending_date`.
    pub max_ending_date: JalaliDate,
    /// Directory holding the dataset and checkpoint files.
    pub results_dir: PathBuf,
    /// Checkpoint file name inside `results_dir`.
    pub checkpoint_file: String,
    /// Dataset file name inside `results_dir`.
    pub dataset_file: String,
    /// Archive base URL.
    pub base_url: String,
    /// Archive series name (e.g. a single currency's series).
    pub series: String,
    /// User-agent header value.
    pub user_agent: String,
    /// Retry policy for archive requests.
    pub retry: RetryPolicy,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Output format tag.
    pub output_format: OutputFormat,
}

impl CrawlerConfig {
    /// Full path of the checkpoint file.
    pub fn checkpoint_path(&self) -> PathBuf {
        self.results_dir.join(&self.checkpoint_file)
    }

    /// Full path of the dataset file.
    pub fn dataset_path(&self) -> PathBuf {
        self.results_dir.join(&self.dataset_file)
    }

    /// Replace the results directory, keeping file names.
    pub fn with_results_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.results_dir = dir.as_ref().to_path_buf();
        self
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        let min: JalaliDate = DEFAULT_MIN_STARTING_DATE
            .parse()
            .expect("default minimum date constant is valid");
        let max: JalaliDate = DEFAULT_MAX_ENDING_DATE
            .parse()
            .expect("default maximum date constant is valid");
        Self {
            starting_date: min,
            ending_date: max,
            min_starting_date: min,
            max_ending_date: max,
            results_dir: PathBuf::from("results"),
            checkpoint_file: "last_crawled_date.txt".to_string(),
            dataset_file: "all_data.csv".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            series: DEFAULT_SERIES.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            output_format: OutputFormat::Csv,
        }
    }
}
