//! Archive HTTP client
//!
//! Wraps a `reqwest` client with the archive-tool query contract, a fixed
//! request timeout, and a bounded exponential-backoff retry policy. Retries
//! fire only on connection-level failures and the status codes named by
//! [`RetryPolicy::is_retryable_status`]; other client errors propagate
//! immediately.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fetcher::retry::RetryPolicy;
use crate::fetcher::{FetcherError, FetcherResult};
use crate::jalali::JalaliDate;

/// HTTP client for the tgju archive-tool endpoint.
pub struct ArchiveHttpClient {
    client: Client,
    base_url: String,
    series: String,
    retry: RetryPolicy,
}

impl ArchiveHttpClient {
    /// Create a new client.
    ///
    /// The timeout and user-agent are fixed at the client level so every
    /// request inherits them; the retry policy is immutable for the lifetime
    /// of the client.
    pub fn new(
        base_url: impl Into<String>,
        series: impl Into<String>,
        user_agent: &str,
        timeout: std::time::Duration,
        retry: RetryPolicy,
    ) -> FetcherResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetcherError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            series: series.into(),
            retry,
        })
    }

    /// The configured retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The configured series name.
    pub fn series(&self) -> &str {
        &self.series
    }

    /// Fetch the archive record for one Jalali calendar day.
    ///
    /// Returns the raw JSON value; the caller decides which fields to keep.
    pub async fn fetch(&self, date: &JalaliDate) -> FetcherResult<Value> {
        let params: [(&str, String); 8] = [
            ("act", "archive-tool".to_string()),
            ("noview", String::new()),
            ("client", "ajax".to_string()),
            ("v", "200".to_string()),
            ("name", self.series.clone()),
            ("year", date.year().to_string()),
            ("month", date.month().to_string()),
            ("day", date.day().to_string()),
        ];

        debug!(%date, series = %self.series, "requesting archive record");
        self.request_with_retry(&params).await
    }

    /// Execute the GET request, retrying transient failures with backoff.
    async fn request_with_retry(&self, params: &[(&str, String)]) -> FetcherResult<Value> {
        let max_attempts = self.retry.max_attempts;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let response = match self.client.get(&self.base_url).query(params).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "network error talking to archive"
                    );
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        let backoff = self.retry.delay(attempt);
                        debug!(?backoff, "retrying after network error");
                        tokio::time::sleep(backoff).await;
                        continue;
                    }
                    break;
                }
            };

            let status = response.status();

            if self.retry.is_retryable_status(status.as_u16()) {
                warn!(
                    attempt,
                    max_attempts,
                    status = status.as_u16(),
                    "retryable status from archive"
                );
                last_error = format!("status {status}");
                if attempt < max_attempts {
                    let backoff = self.retry.delay(attempt);
                    debug!(?backoff, "retrying after retryable status");
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                break;
            }

            if status.is_client_error() || status.is_server_error() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unreadable body>".to_string());
                return Err(FetcherError::HttpError {
                    status: status.as_u16(),
                    body,
                });
            }

            return match response.json::<Value>().await {
                Ok(value) => {
                    debug!(attempt, "archive request succeeded");
                    Ok(value)
                }
                Err(e) => Err(FetcherError::ParseError(e.to_string())),
            };
        }

        Err(FetcherError::RemoteUnavailable {
            attempts: max_attempts,
            last_error,
        })
    }
}
