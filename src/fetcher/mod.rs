//! Archive data fetching

/// Archive HTTP client
pub mod archive_http;

/// Retry policy
pub mod retry;

pub use archive_http::ArchiveHttpClient;
pub use retry::RetryPolicy;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Retries exhausted against the archive endpoint
    #[error("archive unavailable after {attempts} attempts: {last_error}")]
    RemoteUnavailable {
        /// Attempts made before giving up
        attempts: u32,
        /// Error observed on the final attempt
        last_error: String,
    },

    /// Non-retryable HTTP status
    #[error("HTTP error {status}: {body}")]
    HttpError {
        /// Status code returned by the archive
        status: u16,
        /// Response body, if readable
        body: String,
    },

    /// Response body was not JSON
    #[error("parse error: {0}")]
    ParseError(String),

    /// Client construction failure
    #[error("client error: {0}")]
    ClientError(String),
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;
