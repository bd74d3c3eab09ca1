//! CLI error types and conversions

use crate::crawler::CrawlError;
use crate::fetcher::FetcherError;
use crate::jalali::JalaliError;
use crate::output::OutputError;
use crate::range::RangeError;
use crate::resume::CheckpointError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Date parsing error
    #[error("date error: {0}")]
    JalaliError(#[from] JalaliError),

    /// Range validation error
    #[error("range error: {0}")]
    RangeError(#[from] RangeError),

    /// Crawl error
    #[error("crawl error: {0}")]
    CrawlError(#[from] CrawlError),

    /// Fetcher error
    #[error("fetcher error: {0}")]
    FetcherError(#[from] FetcherError),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),

    /// Checkpoint error
    #[error("checkpoint error: {0}")]
    CheckpointError(#[from] CheckpointError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
