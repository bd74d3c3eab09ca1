//! Solar Hijri (Jalali) calendar dates
//!
//! All crawler date arithmetic happens in the Jalali calendar: the archive
//! endpoint is addressed by Jalali year/month/day and the dataset and
//! checkpoint files store Jalali `YYYY-MM-DD` strings. Conversion to the
//! Gregorian calendar goes through the Julian day number, with `chrono`
//! handling the Gregorian side.

use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

/// Earliest supported Jalali year.
pub const MIN_YEAR: i32 = 1178;

/// Latest supported Jalali year.
pub const MAX_YEAR: i32 = 3000;

/// Offset between a Julian day number and chrono's days-from-CE count.
const JDN_CE_OFFSET: i64 = 1_721_425;

/// Year boundaries of the 2820-year Jalali leap cycle segments.
const BREAKS: [i64; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Jalali date errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JalaliError {
    /// Input string is not `YYYY-MM-DD`
    #[error("invalid date format '{0}', expected YYYY-MM-DD")]
    InvalidFormat(String),

    /// Year outside the supported range
    #[error("year {0} out of supported range {MIN_YEAR}..={MAX_YEAR}")]
    YearOutOfRange(i32),

    /// Month outside 1..=12
    #[error("invalid month {0}")]
    InvalidMonth(u32),

    /// Day outside the month's length
    #[error("invalid day {day} for month {month} of year {year}")]
    InvalidDay {
        /// Jalali year
        year: i32,
        /// Jalali month
        month: u32,
        /// Offending day of month
        day: u32,
    },
}

/// A calendar date in the solar Hijri (Jalali) calendar.
///
/// Dates are day-granular with no time-of-day component, so the derived
/// ordering over `(year, month, day)` is total and transitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
}

impl JalaliDate {
    /// Create a date, validating month and day against the calendar.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, JalaliError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(JalaliError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(JalaliError::InvalidMonth(month));
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(JalaliError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Jalali year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Jalali month (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Jalali day of month (1-31)
    pub fn day(&self) -> u32 {
        self.day
    }

    /// The next calendar day.
    pub fn succ(&self) -> Self {
        from_jdn(self.to_jdn() + 1)
    }

    /// Number of days from `self` to `other` (negative if `other` is earlier).
    pub fn days_until(&self, other: &JalaliDate) -> i64 {
        other.to_jdn() - self.to_jdn()
    }

    /// Equivalent Gregorian date.
    pub fn to_gregorian(&self) -> NaiveDate {
        // Year bounds enforced in `new` keep the JDN inside chrono's range.
        NaiveDate::from_num_days_from_ce_opt((self.to_jdn() - JDN_CE_OFFSET) as i32)
            .unwrap_or_default()
    }

    /// Convert a Gregorian date.
    pub fn from_gregorian(date: NaiveDate) -> Result<Self, JalaliError> {
        let jdn = i64::from(date.num_days_from_ce()) + JDN_CE_OFFSET;
        let converted = from_jdn(jdn);
        // Re-validate so out-of-range Gregorian inputs surface as errors.
        Self::new(converted.year, converted.month, converted.day)
    }

    /// Day of week of the equivalent Gregorian date.
    pub fn weekday(&self) -> Weekday {
        self.to_gregorian().weekday()
    }

    /// Three-letter weekday label (`Sat`, `Sun`, ...) used for the `day` column.
    pub fn weekday_abbrev(&self) -> &'static str {
        match self.weekday() {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Julian day number of this date.
    fn to_jdn(&self) -> i64 {
        let cal = jal_cal(i64::from(self.year));
        let jm = i64::from(self.month);
        let jd = i64::from(self.day);
        gregorian_to_jdn(cal.gy, 3, cal.march) + (jm - 1) * 31 - jm / 7 * (jm - 7) + jd - 1
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for JalaliDate {
    type Err = JalaliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.splitn(3, '-');
        let (year, month, day) = match (parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(m), Some(d)) => {
                let year = y
                    .parse::<i32>()
                    .map_err(|_| JalaliError::InvalidFormat(s.to_string()))?;
                let month = m
                    .parse::<u32>()
                    .map_err(|_| JalaliError::InvalidFormat(s.to_string()))?;
                let day = d
                    .parse::<u32>()
                    .map_err(|_| JalaliError::InvalidFormat(s.to_string()))?;
                (year, month, day)
            }
            _ => return Err(JalaliError::InvalidFormat(s.to_string())),
        };
        Self::new(year, month, day)
    }
}

/// Whether the given Jalali year is a leap year (Esfand has 30 days).
pub fn is_leap_year(year: i32) -> bool {
    jal_cal(i64::from(year)).leap == 0
}

/// Number of days in the given Jalali month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1..=6 => 31,
        7..=11 => 30,
        12 => {
            if is_leap_year(year) {
                30
            } else {
                29
            }
        }
        _ => 0,
    }
}

struct JalCal {
    /// Years since the last leap year; 0 means the year itself is leap.
    leap: i64,
    /// Gregorian year containing the start of the Jalali year.
    gy: i64,
    /// Gregorian March day of Farvardin 1.
    march: i64,
}

/// Leap-cycle bookkeeping for a Jalali year, after Birashk via jalaali-js.
///
/// Integer division here truncates toward zero, matching the reference
/// formulation; all operands stay positive inside the supported year range.
fn jal_cal(jy: i64) -> JalCal {
    let gy = jy + 621;
    let mut leap_j: i64 = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + jump % 33 / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    JalCal { leap, gy, march }
}

/// Julian day number of a Gregorian calendar date.
fn gregorian_to_jdn(gy: i64, gm: i64, gd: i64) -> i64 {
    let d = (gy + (gm - 8) / 6 + 100_100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd
        - 34_840_408;
    d - (gy + 100_100 + (gm - 8) / 6) / 100 * 3 / 4 + 752
}

/// Jalali date of a Julian day number.
fn from_jdn(jdn: i64) -> JalaliDate {
    let gy = i64::from(
        NaiveDate::from_num_days_from_ce_opt((jdn - JDN_CE_OFFSET) as i32)
            .unwrap_or_default()
            .year(),
    );
    let mut jy = gy - 621;
    let cal = jal_cal(jy);
    let jdn1f = gregorian_to_jdn(gy, 3, cal.march);
    let mut k = jdn - jdn1f;

    if k >= 0 {
        if k <= 185 {
            return JalaliDate {
                year: jy as i32,
                month: (1 + k / 31) as u32,
                day: (k % 31 + 1) as u32,
            };
        }
        k -= 186;
    } else {
        jy -= 1;
        k += 179;
        if cal.leap == 1 {
            k += 1;
        }
    }

    JalaliDate {
        year: jy as i32,
        month: (7 + k / 30) as u32,
        day: (k % 30 + 1) as u32,
    }
}
