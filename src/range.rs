//! Date range validation
//!
//! The archive only serves a bounded window of days, so the requested range
//! is checked against the configured absolute bounds before any network or
//! file I/O happens. Every violation is fatal.

use crate::jalali::JalaliDate;

/// Range validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    /// Start date after end date
    #[error("starting date {start} is after ending date {end}")]
    InvalidRange {
        /// Requested start
        start: JalaliDate,
        /// Requested end
        end: JalaliDate,
    },

    /// Start date before the configured minimum
    #[error("starting date {start} is before the minimum supported date {min}")]
    BelowMinimum {
        /// Requested start
        start: JalaliDate,
        /// Configured minimum
        min: JalaliDate,
    },

    /// End date after the configured maximum
    #[error("ending date {end} is after the maximum supported date {max}")]
    AboveMaximum {
        /// Requested end
        end: JalaliDate,
        /// Configured maximum
        max: JalaliDate,
    },
}

/// A validated inclusive range of Jalali calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: JalaliDate,
    end: JalaliDate,
}

impl DateRange {
    /// Validate the requested range against the configured bounds.
    ///
    /// Checks run in a fixed order: reversed range first, then the lower
    /// bound, then the upper bound. The first violation wins.
    pub fn normalize(
        start: JalaliDate,
        end: JalaliDate,
        min: JalaliDate,
        max: JalaliDate,
    ) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        if start < min {
            return Err(RangeError::BelowMinimum { start, min });
        }
        if end > max {
            return Err(RangeError::AboveMaximum { end, max });
        }
        Ok(Self { start, end })
    }

    /// First day of the range (inclusive).
    pub fn start(&self) -> JalaliDate {
        self.start
    }

    /// Last day of the range (inclusive).
    pub fn end(&self) -> JalaliDate {
        self.end
    }

    /// Number of calendar days in the range, both endpoints included.
    pub fn len_days(&self) -> u64 {
        (self.start.days_until(&self.end) + 1) as u64
    }
}
