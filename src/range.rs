use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Date, DateError, Inclusivity, RANGE_SEPARATOR, Unit, prelude::*};

/// Represents a range between two days (inclusive).
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateRange {
    start: Date,
    end:   Date,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: Date, end: Date },

    /// Error parsing a date component.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: Date, end: Date) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from two days given in either order
    pub fn ordered(a: Date, b: Date) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Returns the start date of the range
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the end date of the range
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns both start and end dates as a tuple
    pub const fn dates(&self) -> (Date, Date) {
        (self.start, self.end)
    }

    /// Checks if the range contains a given date under the endpoint policy
    pub fn contains(&self, date: &Date, inclusivity: Inclusivity) -> bool {
        date.is_between(self.start, self.end, inclusivity)
    }

    /// Number of days covered, counting both endpoints
    pub fn span_days(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }

    /// Every day of the range in order, endpoints included
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end.naive();
        self.start
            .naive()
            .iter_days()
            .take_while(move |day| *day <= end)
            .map(Date::from)
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!("Separator '{RANGE_SEPARATOR}' not found despite count == 1"))
                })?;

                let start = start_str.parse::<Date>()?;
                let end = end_str.parse::<Date>()?;

                Self::new(start, end)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for DateRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateRange {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare start dates first, then end dates
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single day or an inclusive span of days, as listed in highlight and
/// lock configuration. Written `YYYY-MM-DD` or `YYYY-MM-DD/YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DayRule {
    #[display(fmt = "{_0}")]
    Day(Date),
    #[display(fmt = "{_0}")]
    Range(DateRange),
}

impl DayRule {
    /// Checks whether `date` is covered by this rule. Single days match at day
    /// granularity; spans use `inclusivity` for their endpoints.
    pub fn matches(&self, date: &Date, inclusivity: Inclusivity) -> bool {
        match self {
            Self::Day(day) => day.is_same(*date, Unit::Day),
            Self::Range(range) => range.contains(date, inclusivity),
        }
    }
}

impl From<Date> for DayRule {
    fn from(date: Date) -> Self {
        Self::Day(date)
    }
}

impl From<DateRange> for DayRule {
    fn from(range: DateRange) -> Self {
        Self::Range(range)
    }
}

impl FromStr for DayRule {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(RANGE_SEPARATOR) {
            s.parse().map(Self::Range)
        } else {
            Ok(Self::Day(s.parse()?))
        }
    }
}

impl Serialize for DayRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DayRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
