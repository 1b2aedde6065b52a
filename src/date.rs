use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{Datelike, Days, Local, Months, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{DATE_FORMAT, JANUARY, MONTHS_PER_YEAR, THURSDAY, prelude::*};

/// A wall-clock calendar day.
///
/// `Date` is a plain value: arithmetic returns a new value and never touches
/// the receiver, so dates can be handed around freely without cloning.
/// All comparisons are at day granularity unless a coarser [`Unit`] is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct Date(NaiveDate);

/// Error type for constructing or parsing a [`Date`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The normalized date is outside the representable calendar.
    #[error("Date is out of the representable range")]
    OutOfRange,

    /// Text is not a `YYYY-MM-DD` date.
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    /// Text is not one of `()`, `[)`, `(]`, `[]`.
    #[error("Invalid inclusivity: {0} (expected one of (), [), (], [])")]
    InvalidInclusivity(String),
}

/// Granularity used by unit-aware comparisons and arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Day,
    Month,
    Year,
}

/// Which endpoints of an interval count as inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Inclusivity {
    /// `()` - neither endpoint
    #[default]
    #[display(fmt = "()")]
    Exclusive,
    /// `[)` - start only
    #[display(fmt = "[)")]
    StartInclusive,
    /// `(]` - end only
    #[display(fmt = "(]")]
    EndInclusive,
    /// `[]` - both endpoints
    #[display(fmt = "[]")]
    Inclusive,
}

impl Inclusivity {
    const fn includes_start(self) -> bool {
        matches!(self, Self::StartInclusive | Self::Inclusive)
    }

    const fn includes_end(self) -> bool {
        matches!(self, Self::EndInclusive | Self::Inclusive)
    }
}

impl FromStr for Inclusivity {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "()" => Ok(Self::Exclusive),
            "[)" => Ok(Self::StartInclusive),
            "(]" => Ok(Self::EndInclusive),
            "[]" => Ok(Self::Inclusive),
            other => Err(DateError::InvalidInclusivity(other.to_owned())),
        }
    }
}

impl TryFrom<String> for Inclusivity {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Inclusivity> for String {
    fn from(value: Inclusivity) -> Self {
        value.to_string()
    }
}

impl Date {
    /// Builds a date from signed components, rolling over out-of-range
    /// values the way host calendars do: month 13 is January of the next
    /// year, day 0 is the last day of the previous month.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` only if the normalized date cannot be
    /// represented at all.
    pub fn from_ymd(year: i32, month: i32, day: i32) -> Result<Self, DateError> {
        let total_months = i64::from(year) * i64::from(MONTHS_PER_YEAR) + i64::from(month) - 1;
        let year = i32::try_from(total_months.div_euclid(i64::from(MONTHS_PER_YEAR)))
            .map_err(|_| DateError::OutOfRange)?;
        let month = u32::try_from(total_months.rem_euclid(i64::from(MONTHS_PER_YEAR)))
            .map_err(|_| DateError::OutOfRange)?
            + 1;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateError::OutOfRange)?;
        Self(first).add_days(i64::from(day) - 1)
    }

    /// Truncates a Unix timestamp in milliseconds to its local calendar day.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the timestamp is not representable.
    pub fn from_timestamp_millis(millis: i64) -> Result<Self, DateError> {
        Local
            .timestamp_millis_opt(millis)
            .earliest()
            .map(|moment| Self(moment.date_naive()))
            .ok_or(DateError::OutOfRange)
    }

    /// The current local day
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Returns the underlying chrono date
    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month of the year, `1..=12`
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day of the month, `1..=31`
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Day of the week, `0 = Sunday ..= 6 = Saturday`
    pub fn weekday(self) -> u8 {
        // num_days_from_sunday is always < 7
        u8::try_from(self.0.weekday().num_days_from_sunday()).unwrap_or_default()
    }

    /// First day of this date's month
    pub fn first_of_month(self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    /// Number of days in this date's month
    pub fn days_in_month(self) -> u32 {
        let first = self.first_of_month().0;
        first
            .checked_add_months(Months::new(1))
            .map_or(31, |next| u32::try_from(next.signed_duration_since(first).num_days()).unwrap_or(31))
    }

    /// Signed number of days from `self` to `other` (positive if `other` is later)
    pub fn days_until(self, other: Self) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Adds `days` (which may be negative).
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` on calendar overflow.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let step = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(step)
        } else {
            self.0.checked_sub_days(step)
        };
        shifted.map(Self).ok_or(DateError::OutOfRange)
    }

    /// Adds `amount` units. Month and year steps clamp to the last day of the
    /// target month (January 31 plus one month is the end of February).
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` on calendar overflow.
    pub fn add(self, amount: i64, unit: Unit) -> Result<Self, DateError> {
        match unit {
            Unit::Day => self.add_days(amount),
            Unit::Month => self.add_months(amount),
            Unit::Year => self.add_months(
                amount
                    .checked_mul(i64::from(MONTHS_PER_YEAR))
                    .ok_or(DateError::OutOfRange)?,
            ),
        }
    }

    /// Subtracts `amount` units; see [`Date::add`].
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` on calendar overflow.
    pub fn subtract(self, amount: i64, unit: Unit) -> Result<Self, DateError> {
        self.add(amount.checked_neg().ok_or(DateError::OutOfRange)?, unit)
    }

    fn add_months(self, months: i64) -> Result<Self, DateError> {
        let step = Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| DateError::OutOfRange)?);
        let shifted = if months >= 0 {
            self.0.checked_add_months(step)
        } else {
            self.0.checked_sub_months(step)
        };
        shifted.map(Self).ok_or(DateError::OutOfRange)
    }

    /// Compares two dates after truncating both to `unit`
    pub fn cmp_at(self, other: Self, unit: Unit) -> Ordering {
        self.truncated(unit).cmp(&other.truncated(unit))
    }

    fn truncated(self, unit: Unit) -> (i32, u32, u32) {
        match unit {
            Unit::Day => (self.year(), self.month(), self.day()),
            Unit::Month => (self.year(), self.month(), 0),
            Unit::Year => (self.year(), 0, 0),
        }
    }

    pub fn is_same(self, other: Self, unit: Unit) -> bool {
        self.cmp_at(other, unit) == Ordering::Equal
    }

    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    pub fn is_same_or_before(self, other: Self) -> bool {
        self <= other
    }

    pub fn is_same_or_after(self, other: Self) -> bool {
        self >= other
    }

    /// Checks whether `self` lies between `start` and `end` under the given
    /// endpoint policy. An inverted interval contains nothing.
    pub fn is_between(self, start: Self, end: Self, inclusivity: Inclusivity) -> bool {
        let after_start = if inclusivity.includes_start() {
            self >= start
        } else {
            self > start
        };
        let before_end = if inclusivity.includes_end() {
            self <= end
        } else {
            self < end
        };
        after_start && before_end
    }

    /// Week number of this date for weeks beginning on `first_day`
    /// (`0 = Sunday`).
    ///
    /// Week 1 starts on January 1 when that day is `first_day`, otherwise on
    /// the year's first Thursday. Days falling before that anchor in the same
    /// week still count as week 1.
    pub fn week_number(self, first_day: u8) -> u32 {
        let first_day = u32::from(first_day) % 7;
        let weekday = self.0.weekday().num_days_from_sunday();
        let into_week = u64::from((weekday + 7 - first_day) % 7);
        let week_start = self.0.checked_sub_days(Days::new(into_week)).unwrap_or(self.0);

        let jan_first = NaiveDate::from_ymd_opt(week_start.year(), JANUARY, 1).unwrap_or(week_start);
        let jan_first_weekday = jan_first.weekday().num_days_from_sunday();
        let anchor = if jan_first_weekday == first_day {
            jan_first
        } else {
            let to_thursday = u64::from((u32::from(THURSDAY) + 7 - jan_first_weekday) % 7);
            jan_first.checked_add_days(Days::new(to_thursday)).unwrap_or(jan_first)
        };

        // ceil(elapsed / 7); elapsed is never below -6 here
        let elapsed = week_start.signed_duration_since(anchor).num_days();
        let weeks = (elapsed + 6).div_euclid(7);
        u32::try_from(weeks + 1).unwrap_or(1)
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Self)
            .map_err(|_| DateError::InvalidFormat(trimmed.to_owned()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
