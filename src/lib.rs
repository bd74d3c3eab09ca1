//! # tgju Price Crawler Library
//!
//! A sequential, date-driven crawler for the tgju.org currency price archive.
//! For every calendar day in a bounded solar Hijri (Jalali) date range it
//! fetches one daily price record, appends it to a growing CSV dataset, and
//! records a checkpoint so an interrupted run resumes from the last
//! completed day.
//!
//! ## Features
//!
//! - **Resume Capability**: a single-line checkpoint file names the next
//!   unfetched day; a crash mid-fetch re-fetches that day on restart
//!   (at-least-once semantics per day)
//! - **Bounded Retry**: transient archive failures (429/5xx, connection
//!   errors) are retried with exponential backoff; other errors abort
//! - **Jalali Calendar**: all date arithmetic, formatting, and the archive
//!   query parameters use the solar Hijri calendar
//! - **Crash-Safe Dataset**: the full table is flushed to disk after every
//!   fetched day
//!
//! ## Architecture
//!
//! - [`jalali`] - solar Hijri calendar dates and arithmetic
//! - [`range`] - date range validation against the archive's bounds
//! - [`config`] - immutable run configuration
//! - [`fetcher`] - archive HTTP client with retry policy
//! - [`resume`] - checkpoint store for resumable runs
//! - [`output`] - in-memory dataset accumulator and CSV persistence
//! - [`crawler`] - the day-by-day fetch loop
//! - [`cli`] - command-line surface
//!
//! ## Concurrency
//!
//! The crawler is fully sequential: one fetch completes (including its disk
//! flush) before the next begins. Running two crawler instances against the
//! same results directory is unsupported and may corrupt the checkpoint and
//! dataset files.

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command-line interface
pub mod cli;

/// Run configuration
pub mod config;

/// Fetch loop orchestration
pub mod crawler;

/// Archive data fetching
pub mod fetcher;

/// Solar Hijri calendar dates
pub mod jalali;

/// In-memory dataset and CSV persistence
pub mod output;

/// Date range validation
pub mod range;

/// Checkpoint store for resumable runs
pub mod resume;

// Re-export commonly used types
pub use config::CrawlerConfig;
pub use jalali::JalaliDate;

/// Column names of the dataset, in on-disk order.
pub const COLUMNS: [&str; 12] = [
    "date",
    "day",
    "off",
    "id",
    "item_id",
    "name",
    "price",
    "high",
    "low",
    "open",
    "time",
    "updated_at",
];

/// One day's price quote as stored in the dataset.
///
/// `date`, `day` and `off` are stamped by the crawler; the remaining fields
/// are copied from the archive's JSON response and left empty when the
/// response lacks them or carries an unexpected shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PriceRecord {
    /// Jalali calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Weekday abbreviation for `date`
    pub day: String,
    /// Constant zero placeholder carried in the dataset schema
    pub off: u8,
    /// Archive record id
    pub id: Option<String>,
    /// Archive series item id
    pub item_id: Option<String>,
    /// Series name
    pub name: Option<String>,
    /// Closing price
    pub price: Option<String>,
    /// Daily high
    pub high: Option<String>,
    /// Daily low
    pub low: Option<String>,
    /// Opening price
    pub open: Option<String>,
    /// Quote time reported by the archive
    pub time: Option<String>,
    /// Last update time reported by the archive
    pub updated_at: Option<String>,
}

impl PriceRecord {
    /// Build a record from the archive response for the given day.
    ///
    /// Fields missing from the response, or present with a non-scalar value,
    /// become empty cells rather than errors.
    pub fn from_response(date: &JalaliDate, response: &Value) -> Self {
        Self {
            date: date.to_string(),
            day: date.weekday_abbrev().to_string(),
            off: 0,
            id: scalar_field(response, "id"),
            item_id: scalar_field(response, "item_id"),
            name: scalar_field(response, "name"),
            price: scalar_field(response, "price"),
            high: scalar_field(response, "high"),
            low: scalar_field(response, "low"),
            open: scalar_field(response, "open"),
            time: scalar_field(response, "time"),
            updated_at: scalar_field(response, "updated_at"),
        }
    }
}

/// Extract a named field from a JSON object as its scalar string form.
fn scalar_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
