//! Lock and highlight classification for individual days.
//!
//! A day is locked (unselectable) when any rule holds. The bounds and
//! span rules depend on the current partial selection, so a
//! [`LockEvaluator`] is always built from a configuration and the selection it
//! judges against.

use serde::Serialize;

use crate::{Date, DateRange, Inclusivity, PickerConfig, Selection, Unit, prelude::*};

/// User-supplied lock rule, OR'd into the built-in rules.
pub type LockFilter = dyn Fn(&Date, &Selection) -> bool;

/// Why a day cannot be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    #[display(fmt = "before the minimum date")]
    BeforeMinDate,
    #[display(fmt = "after the maximum date")]
    AfterMaxDate,
    #[display(fmt = "closer to the start than the minimum span allows")]
    BelowMinDays,
    #[display(fmt = "further from the start than the maximum span allows")]
    BeyondMaxDays,
    #[display(fmt = "before the start while selecting forward")]
    BeforeStart,
    #[display(fmt = "after the start while selecting backward")]
    AfterStart,
    #[display(fmt = "a locked day")]
    LockedDay,
    #[display(fmt = "a locked weekday")]
    LockedWeekday,
    #[display(fmt = "rejected by the lock filter")]
    Filter,
    #[display(fmt = "the range would contain a locked day")]
    LockedDaysInRange,
}

/// Visual state of one day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DayFlags {
    pub is_today:          bool,
    pub is_start_date:     bool,
    pub is_end_date:       bool,
    pub is_in_range:       bool,
    pub is_locked:         bool,
    pub is_highlighted:    bool,
    pub is_adjacent_month: bool,
}

impl DayFlags {
    /// Locked cells are skipped by keyboard focus
    pub const fn is_focusable(&self) -> bool {
        !self.is_locked
    }
}

/// Judges days against a configuration and a selection.
#[derive(Clone, Copy)]
pub struct LockEvaluator<'a> {
    config:    &'a PickerConfig,
    selection: &'a Selection,
    filter:    Option<&'a LockFilter>,
}

impl<'a> LockEvaluator<'a> {
    pub const fn new(config: &'a PickerConfig, selection: &'a Selection) -> Self {
        Self {
            config,
            selection,
            filter: None,
        }
    }

    #[must_use]
    pub const fn with_filter(mut self, filter: Option<&'a LockFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn is_locked(&self, date: &Date) -> bool {
        self.lock_reason(date).is_some()
    }

    /// The first rule that locks `date`, if any
    pub fn lock_reason(&self, date: &Date) -> Option<LockReason> {
        self.bounds_reason(date)
            .or_else(|| self.span_reason(date))
            .or_else(|| self.custom_reason(date))
    }

    /// The `min_date` / `max_date` rules alone
    pub fn bounds_reason(&self, date: &Date) -> Option<LockReason> {
        if self.config.min_date.is_some_and(|min| date.is_before(min)) {
            return Some(LockReason::BeforeMinDate);
        }
        if self.config.max_date.is_some_and(|max| date.is_after(max)) {
            return Some(LockReason::AfterMaxDate);
        }
        None
    }

    /// Rules that only apply while a range waits for its second day
    fn span_reason(&self, date: &Date) -> Option<LockReason> {
        let start = self.selection.pending_start()?;
        let distance = start.days_until(*date).abs();

        // The nearest `min_days - 1` days on either side are locked; `start`
        // itself and anything `min_days` away stay pickable.
        if self.config.min_days.is_some_and(|min| (1..i64::from(min)).contains(&distance)) {
            return Some(LockReason::BelowMinDays);
        }
        if self.config.max_days.is_some_and(|max| distance >= i64::from(max)) {
            return Some(LockReason::BeyondMaxDays);
        }
        if self.config.select_forward && date.is_before(start) {
            return Some(LockReason::BeforeStart);
        }
        if self.config.select_backward && date.is_after(start) {
            return Some(LockReason::AfterStart);
        }
        None
    }

    /// Lock days, locked weekdays and the user filter
    pub fn custom_reason(&self, date: &Date) -> Option<LockReason> {
        let inclusivity = self.config.lock_days_inclusivity;
        if self.config.lock_days.iter().any(|rule| rule.matches(date, inclusivity)) {
            return Some(LockReason::LockedDay);
        }
        if self.config.locked_weekdays.contains(&date.weekday()) {
            return Some(LockReason::LockedWeekday);
        }
        if self.filter.is_some_and(|filter| filter(date, self.selection)) {
            return Some(LockReason::Filter);
        }
        None
    }

    /// Checks whether any day of `range` is locked by the custom rules
    pub fn range_has_locked_days(&self, range: &DateRange) -> bool {
        range.days().any(|day| self.custom_reason(&day).is_some())
    }

    pub fn is_highlighted(&self, date: &Date) -> bool {
        self.config
            .highlighted_days
            .iter()
            .any(|rule| rule.matches(date, Inclusivity::Inclusive))
    }

    /// Projects the selection, lock rules and highlights onto one day.
    /// `is_adjacent_month` is left for the grid to set.
    pub fn classify(&self, date: &Date, today: &Date) -> DayFlags {
        let (is_start_date, is_end_date, is_in_range) = match *self.selection {
            Selection::Empty => (false, false, false),
            Selection::OnePicked { start } => (start.is_same(*date, Unit::Day), false, false),
            Selection::Complete { start, end } => (
                start.is_same(*date, Unit::Day),
                end.is_same(*date, Unit::Day),
                date.is_between(start, end, Inclusivity::Exclusive),
            ),
        };

        DayFlags {
            is_today: today.is_same(*date, Unit::Day),
            is_start_date,
            is_end_date,
            is_in_range,
            is_locked: self.is_locked(date),
            is_highlighted: self.is_highlighted(date),
            is_adjacent_month: false,
        }
    }
}
