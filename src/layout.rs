//! Month grids and the set of months on screen.

use std::{array, fmt};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::{DAYS_PER_WEEK, Date, DateError, MONTHS_PER_YEAR, SUNDAY, Unit};

/// A calendar month of a particular year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "Date", from = "Date")]
pub struct MonthRef {
    first: Date,
}

impl MonthRef {
    /// Builds a month reference, rolling months outside `1..=12` into
    /// neighbouring years.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the month cannot be represented.
    pub fn new(year: i32, month: i32) -> Result<Self, DateError> {
        Date::from_ymd(year, month, 1).map(Self::of)
    }

    /// The month containing `date`
    pub fn of(date: Date) -> Self {
        Self {
            first: date.first_of_month(),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// Month of the year, `1..=12`
    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// The first day of the month
    pub const fn first_day(self) -> Date {
        self.first
    }

    pub fn days_in_month(self) -> u32 {
        self.first.days_in_month()
    }

    /// Moves by `months` (which may be negative).
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if the result cannot be represented.
    pub fn shift(self, months: i64) -> Result<Self, DateError> {
        self.first.add(months, Unit::Month).map(Self::of)
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(self, other: Self) -> i64 {
        let index = |m: Self| i64::from(m.year()) * i64::from(MONTHS_PER_YEAR) + i64::from(m.month());
        index(other) - index(self)
    }

    /// Checks whether `date` falls in this month
    pub fn contains(self, date: Date) -> bool {
        self.first.is_same(date, Unit::Month)
    }
}

impl From<Date> for MonthRef {
    fn from(date: Date) -> Self {
        Self::of(date)
    }
}

impl From<MonthRef> for Date {
    fn from(month: MonthRef) -> Self {
        month.first
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// One slot of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDay {
    pub date:     Date,
    /// The day belongs to the previous or next month and only pads the row
    pub adjacent: bool,
}

/// Seven consecutive days forming one row of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridWeek {
    /// Week number of the row's first day, when week numbers are shown
    pub week_number: Option<u32>,
    pub days:        [GridDay; DAYS_PER_WEEK],
}

/// The day matrix for one month.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthGrid {
    pub month:      MonthRef,
    /// Leading slots filled from the previous month
    pub skip_days:  u32,
    pub total_days: u32,
    pub weeks:      Vec<GridWeek>,
}

/// Number of leading slots before the 1st for weeks starting on `first_day`
pub fn skip_days(first_of_month: Date, first_day: u8) -> u32 {
    u32::from((first_of_month.weekday() + 7 - first_day % 7) % 7)
}

/// Weekdays in column order for weeks starting on `first_day` (`0 = Sunday`)
pub fn weekday_header(first_day: u8) -> [Weekday; DAYS_PER_WEEK] {
    let mut weekday = (SUNDAY..first_day % 7).fold(Weekday::Sun, |w, _| w.succ());
    array::from_fn(|_| {
        let current = weekday;
        weekday = weekday.succ();
        current
    })
}

/// Lays out `month` as complete week rows.
///
/// Rows start on `first_day`. Days before the 1st are filled from the
/// previous month, and the last row is filled forward into the next month
/// until it holds seven days.
///
/// # Errors
/// Returns `DateError::OutOfRange` if a padding day cannot be represented.
pub fn month_grid(month: MonthRef, first_day: u8, show_week_numbers: bool) -> Result<MonthGrid, DateError> {
    let first = month.first_day();
    let skip_days = skip_days(first, first_day);
    let total_days = month.days_in_month();

    let week_len = u32::try_from(DAYS_PER_WEEK).unwrap_or(7);
    let slots = (skip_days + total_days).div_ceil(week_len) * week_len;
    let grid_start = first.add_days(-i64::from(skip_days))?;

    let mut cells = Vec::with_capacity(DAYS_PER_WEEK * 6);
    for offset in 0..slots {
        let date = grid_start.add_days(i64::from(offset))?;
        cells.push(GridDay {
            date,
            adjacent: !month.contains(date),
        });
    }

    let weeks = cells
        .chunks_exact(DAYS_PER_WEEK)
        .map(|chunk| {
            let days: [GridDay; DAYS_PER_WEEK] = array::from_fn(|i| chunk[i]);
            GridWeek {
                week_number: show_week_numbers.then(|| days[0].date.week_number(first_day)),
                days,
            }
        })
        .collect();

    Ok(MonthGrid {
        month,
        skip_days,
        total_days,
        weeks,
    })
}

/// The months currently on screen, one per panel.
///
/// Without split view the panels are consecutive months and move together.
/// With split view each panel keeps its own month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleCalendars {
    months:     Vec<MonthRef>,
    split_view: bool,
}

impl VisibleCalendars {
    /// `count` consecutive months starting at `anchor`.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if a month cannot be represented.
    pub fn new(anchor: MonthRef, count: usize, split_view: bool) -> Result<Self, DateError> {
        let months = (0..count)
            .map(|offset| anchor.shift(i64::try_from(offset).map_err(|_| DateError::OutOfRange)?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { months, split_view })
    }

    pub fn months(&self) -> &[MonthRef] {
        &self.months
    }

    pub fn get(&self, panel: usize) -> Option<MonthRef> {
        self.months.get(panel).copied()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub const fn is_split_view(&self) -> bool {
        self.split_view
    }

    pub fn first(&self) -> Option<MonthRef> {
        self.months.first().copied()
    }

    pub fn last(&self) -> Option<MonthRef> {
        self.months.last().copied()
    }

    /// The calendars with `panel` showing `target`. Without split view the
    /// whole window moves so that `panel` lands on `target`.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if a month cannot be represented.
    pub fn with_panel_month(&self, panel: usize, target: MonthRef) -> Result<Self, DateError> {
        if self.split_view {
            let mut months = self.months.clone();
            if let Some(slot) = months.get_mut(panel) {
                *slot = target;
            }
            return Ok(Self {
                months,
                split_view: true,
            });
        }
        let back = i64::try_from(panel).map_err(|_| DateError::OutOfRange)?;
        Self::new(target.shift(-back)?, self.months.len(), false)
    }

    /// The calendars after moving `panel` by `months`. Without split view the
    /// whole window moves.
    ///
    /// # Errors
    /// Returns `DateError::OutOfRange` if a month cannot be represented.
    pub fn shifted(&self, panel: usize, months: i64) -> Result<Self, DateError> {
        if self.split_view {
            let target = self.get(panel).ok_or(DateError::OutOfRange)?.shift(months)?;
            return self.with_panel_month(panel, target);
        }
        let anchor = self.first().ok_or(DateError::OutOfRange)?.shift(months)?;
        Self::new(anchor, self.months.len(), false)
    }
}
