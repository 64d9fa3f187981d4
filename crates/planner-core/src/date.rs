use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Wire and storage format of every date: `YYYYMMDD`, zero padded.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// A calendar day without time of day.
///
/// Ordering and equality are by calendar day. The textual form is always the
/// eight character `YYYYMMDD` string, which also sorts chronologically, so the
/// store can compare dates as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parses the strict `YYYYMMDD` form.
    ///
    /// chrono's `%Y` also accepts signs and shorter years, so the shape is
    /// checked before handing the text over.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidDate(text.to_string()));
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Self)
            .map_err(|_| CoreError::InvalidDate(text.to_string()))
    }

    #[inline]
    pub fn naive(self) -> NaiveDate {
        self.0
    }

    #[inline]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[inline]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[inline]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// ISO weekday number, Monday = 1 through Sunday = 7.
    #[inline]
    pub fn iso_weekday(self) -> u32 {
        self.0.weekday().number_from_monday()
    }

    /// Length of this date's month, leap years included.
    pub fn days_in_month(self) -> u32 {
        let first_of_next = if self.month() == 12 {
            NaiveDate::from_ymd_opt(self.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year(), self.month() + 1, 1)
        };
        first_of_next
            .and_then(|d| d.pred_opt())
            .map_or(31, |last| last.day())
    }

    /// 9999-12-31, the last day with an eight character `YYYYMMDD` form.
    ///
    /// Every forward step saturates here, so stepping never produces a date
    /// the wire format cannot carry.
    pub fn max() -> Self {
        Self(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX))
    }

    fn capped(date: Option<NaiveDate>) -> Self {
        let max = Self::max();
        date.map(Self).filter(|d| *d <= max).unwrap_or(max)
    }

    /// The following day, saturating at [`TaskDate::max`].
    #[inline]
    pub fn succ(self) -> Self {
        Self::capped(self.0.succ_opt())
    }

    /// `self + days`, saturating at [`TaskDate::max`].
    pub fn add_days(self, days: u64) -> Self {
        Self::capped(self.0.checked_add_days(Days::new(days)))
    }

    /// Same month and day one year later.
    ///
    /// February 29 has no counterpart in a common year and rolls over to
    /// March 1 of that year; repeated application keeps the March 1 date.
    pub fn add_year(self) -> Self {
        let year = self.year() + 1;
        Self::capped(
            self.0
                .with_year(year)
                .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1)),
        )
    }

    /// Whole days from `earlier` to `self`, negative when `self` is before it.
    #[inline]
    pub fn days_since(self, earlier: TaskDate) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl From<NaiveDate> for TaskDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Reduces an instant to its UTC calendar day.
impl From<DateTime<Utc>> for TaskDate {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }
}

impl fmt::Display for TaskDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for TaskDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TaskDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
