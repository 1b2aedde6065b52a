use std::fmt;

use crate::{
    ConfigError, Date, DateError, DateRange, DayFlags, LockEvaluator, LockFilter, LockReason, MonthPanel, MonthRef,
    PickerConfig, PickerEvent, PickerListener, Selection, SelectionPolicy, VisibleCalendars, render,
};

/// A pick refused by the lock rules. The picker state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("Cannot pick {date}: {reason}")]
pub struct PickRejected {
    pub date:   Date,
    pub reason: LockReason,
}

/// Navigation that would leave the configured bounds or address a missing
/// panel. The visible months are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("Cannot show {month}: outside the selectable months")]
    OutOfRange { month: MonthRef },

    #[error("No panel {index} (showing {count})")]
    NoSuchPanel { index: usize, count: usize },

    #[error(transparent)]
    Date(#[from] DateError),
}

/// A date or date-range picker: selection state, visible months and the
/// rendered panels that follow from them.
///
/// Every state change re-renders all panels and notifies listeners before
/// returning.
pub struct Picker {
    config:       PickerConfig,
    lock_filter:  Option<Box<LockFilter>>,
    selection:    Selection,
    calendars:    VisibleCalendars,
    today:        Date,
    /// `today` is re-read from the local clock before each render
    follow_clock: bool,
    panels:       Vec<MonthPanel>,
    listeners:    Vec<Box<dyn PickerListener>>,
}

impl fmt::Debug for Picker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("config", &self.config)
            .field("has_lock_filter", &self.lock_filter.is_some())
            .field("selection", &self.selection)
            .field("calendars", &self.calendars)
            .field("today", &self.today)
            .field("follow_clock", &self.follow_clock)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Picker {
    /// Builds a picker for the current local day.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found by validation.
    pub fn new(config: PickerConfig) -> Result<Self, ConfigError> {
        let mut picker = Self::new_at(config, Date::today())?;
        picker.follow_clock = true;
        Ok(picker)
    }

    /// Builds a picker that treats `today` as the current day.
    ///
    /// The initial selection comes from `start_date` / `end_date`, and the
    /// first panel shows the start date's month, or `today`'s without one.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found by validation.
    pub fn new_at(config: PickerConfig, today: Date) -> Result<Self, ConfigError> {
        config.validate()?;

        let selection = match (config.start_date, config.end_date) {
            (Some(start), _) if config.single_mode => Selection::single(start),
            (Some(start), Some(end)) => Selection::range(start, end),
            (Some(start), None) => Selection::OnePicked { start },
            (None, _) => Selection::Empty,
        };
        let anchor = MonthRef::of(config.start_date.unwrap_or(today));
        let calendars = VisibleCalendars::new(anchor, config.number_of_months, config.split_view)?;

        let mut picker = Self {
            config,
            lock_filter: None,
            selection,
            calendars,
            today,
            follow_clock: false,
            panels: Vec::new(),
            listeners: Vec::new(),
        };
        picker.panels = picker.render_for(&picker.calendars)?;
        tracing::debug!(
            months = picker.calendars.len(),
            split_view = picker.calendars.is_split_view(),
            "picker ready"
        );
        Ok(picker)
    }

    /// Adds a user lock rule, OR'd into the built-in ones
    #[must_use]
    pub fn with_lock_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Date, &Selection) -> bool + 'static,
    {
        self.lock_filter = Some(Box::new(filter));
        self.refresh();
        self
    }

    /// Registers a listener for every later event
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: PickerListener + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    pub fn visible_months(&self) -> &[MonthRef] {
        self.calendars.months()
    }

    pub const fn today(&self) -> Date {
        self.today
    }

    /// Pins the current day to `today` and re-renders. A picker built with
    /// [`Picker::new`] stops following the local clock.
    pub fn set_today(&mut self, today: Date) {
        self.follow_clock = false;
        if self.today != today {
            tracing::debug!(%today, "today changed");
            self.today = today;
            self.refresh();
        }
    }

    /// The panels as of the last state change
    pub fn panels(&self) -> &[MonthPanel] {
        &self.panels
    }

    /// Number of panel columns the presenter should lay out
    pub const fn columns(&self) -> usize {
        self.config.number_of_columns
    }

    pub fn is_locked(&self, date: &Date) -> bool {
        self.evaluator().is_locked(date)
    }

    pub fn lock_reason(&self, date: &Date) -> Option<LockReason> {
        self.evaluator().lock_reason(date)
    }

    /// Visual state of `date` under the current selection. Adjacent-month
    /// status depends on the panel and is only set in [`Picker::panels`].
    pub fn classify(&self, date: &Date) -> DayFlags {
        self.evaluator().classify(date, &self.today)
    }

    /// Picks a day.
    ///
    /// Locked days are refused without touching the selection. With
    /// `require_reset`, picking on a complete selection is ignored and the
    /// current selection is returned.
    ///
    /// # Errors
    /// Returns `PickRejected` with the first lock rule that applies.
    pub fn pick_date(&mut self, date: Date) -> Result<Selection, PickRejected> {
        if let Some(reason) = self.pick_lock_reason(&date) {
            tracing::debug!(%date, %reason, "pick rejected");
            self.emit(&PickerEvent::PickRejected { date, reason });
            return Err(PickRejected { date, reason });
        }

        let policy = SelectionPolicy::from(&self.config);
        match self.selection.advance(date, policy) {
            Some(next) => {
                self.commit_selection(next);
            },
            None => {
                tracing::debug!(%date, "selection complete; pick ignored until reset");
            },
        }
        Ok(self.selection)
    }

    fn pick_lock_reason(&self, date: &Date) -> Option<LockReason> {
        let evaluator = self.evaluator();
        if let Some(reason) = evaluator.lock_reason(date) {
            return Some(reason);
        }
        let start = self.selection.pending_start()?;
        let span = DateRange::ordered(start, *date);
        (self.config.disallow_lock_days_in_range && evaluator.range_has_locked_days(&span))
            .then_some(LockReason::LockedDaysInRange)
    }

    /// Clears the selection
    pub fn reset_selection(&mut self) -> Selection {
        if !self.selection.is_empty() {
            self.commit_selection(Selection::Empty);
        }
        self.selection
    }

    /// Selects one day directly. Only the `min_date` / `max_date` bounds
    /// apply.
    ///
    /// # Errors
    /// Returns `PickRejected` if the day is outside the bounds.
    pub fn set_date(&mut self, date: Date) -> Result<Selection, PickRejected> {
        self.check_bounds(&date)?;
        self.commit_selection(Selection::single(date));
        Ok(self.selection)
    }

    /// Selects a span directly, in either order. Only the `min_date` /
    /// `max_date` bounds apply. In single mode only `a` is kept.
    ///
    /// # Errors
    /// Returns `PickRejected` if either day is outside the bounds.
    pub fn set_date_range(&mut self, a: Date, b: Date) -> Result<Selection, PickRejected> {
        if self.config.single_mode {
            return self.set_date(a);
        }
        self.check_bounds(&a)?;
        self.check_bounds(&b)?;
        self.commit_selection(Selection::range(a, b));
        Ok(self.selection)
    }

    fn check_bounds(&mut self, date: &Date) -> Result<(), PickRejected> {
        let Some(reason) = self.evaluator().bounds_reason(date) else {
            return Ok(());
        };
        let date = *date;
        tracing::debug!(%date, %reason, "date outside bounds");
        self.emit(&PickerEvent::PickRejected { date, reason });
        Err(PickRejected { date, reason })
    }

    /// Shows `month` of `year` on `panel`. Without split view the whole
    /// window moves so that `panel` shows that month.
    ///
    /// # Errors
    /// Returns `NavigationError::NoSuchPanel` for a missing panel and
    /// `NavigationError::OutOfRange` if the month lies before the `min_date`
    /// month or after the `max_date` month.
    pub fn set_visible_month(&mut self, panel: usize, month: u32, year: i32) -> Result<(), NavigationError> {
        self.check_panel(panel)?;
        let target = MonthRef::new(year, i32::try_from(month).map_err(|_| DateError::OutOfRange)?)?;
        if !self.month_in_bounds(target) {
            tracing::debug!(%target, panel, "navigation outside bounds");
            return Err(NavigationError::OutOfRange { month: target });
        }
        let candidate = self.calendars.with_panel_month(panel, target)?;
        self.commit_calendars(candidate)
    }

    /// Moves `panel` forward one month; without split view the window moves
    /// by one month or by a whole window, per `move_by_one_month`.
    ///
    /// # Errors
    /// Returns `NavigationError::OutOfRange` when the panel reports no next
    /// month.
    pub fn next_month(&mut self, panel: usize) -> Result<(), NavigationError> {
        let step = self.window_step();
        self.navigate(panel, step)
    }

    /// Moves `panel` back one month; see [`Picker::next_month`].
    ///
    /// # Errors
    /// Returns `NavigationError::OutOfRange` when the panel reports no
    /// previous month.
    pub fn previous_month(&mut self, panel: usize) -> Result<(), NavigationError> {
        let step = self.window_step();
        self.navigate(panel, -step)
    }

    /// Moves `panel` (or the window) forward twelve months.
    ///
    /// # Errors
    /// Returns `NavigationError::OutOfRange` when the panel reports no next
    /// month or the year jump would leave the bounds.
    pub fn next_year(&mut self, panel: usize) -> Result<(), NavigationError> {
        self.navigate(panel, 12)
    }

    /// Moves `panel` (or the window) back twelve months.
    ///
    /// # Errors
    /// Returns `NavigationError::OutOfRange` when the panel reports no
    /// previous month or the year jump would leave the bounds.
    pub fn previous_year(&mut self, panel: usize) -> Result<(), NavigationError> {
        self.navigate(panel, -12)
    }

    fn window_step(&self) -> i64 {
        if self.calendars.is_split_view() || self.config.move_by_one_month {
            1
        } else {
            i64::try_from(self.calendars.len()).unwrap_or(1)
        }
    }

    fn navigate(&mut self, panel: usize, months: i64) -> Result<(), NavigationError> {
        self.check_panel(panel)?;
        // Without split view the outer panels hold the window's navigation
        let edge = if self.calendars.is_split_view() {
            self.calendars.get(panel)
        } else if months < 0 {
            self.calendars.first()
        } else {
            self.calendars.last()
        };
        let edge = edge.ok_or(NavigationError::NoSuchPanel {
            index: panel,
            count: self.calendars.len(),
        })?;
        let allowed = if months < 0 {
            render::has_previous(&self.config, edge)
        } else {
            render::has_next(&self.config, edge)
        };

        let candidate = self.calendars.shifted(panel, months)?;
        if !allowed || !self.overlaps_bounds(&candidate, panel) {
            let month = edge.shift(months)?;
            tracing::debug!(%month, panel, "navigation outside bounds");
            return Err(NavigationError::OutOfRange { month });
        }
        self.commit_calendars(candidate)
    }

    fn check_panel(&self, panel: usize) -> Result<(), NavigationError> {
        if panel < self.calendars.len() {
            Ok(())
        } else {
            Err(NavigationError::NoSuchPanel {
                index: panel,
                count: self.calendars.len(),
            })
        }
    }

    /// In split view the moved panel must fall within the bound months;
    /// otherwise the window must share at least one month with them.
    fn overlaps_bounds(&self, candidate: &VisibleCalendars, panel: usize) -> bool {
        let (first, last) = if candidate.is_split_view() {
            (candidate.get(panel), candidate.get(panel))
        } else {
            (candidate.first(), candidate.last())
        };
        let (Some(first), Some(last)) = (first, last) else {
            return false;
        };
        let after_min = self.config.min_date.is_none_or(|min| MonthRef::of(min) <= last);
        let before_max = self.config.max_date.is_none_or(|max| first <= MonthRef::of(max));
        after_min && before_max
    }

    /// `month` lies within the `min_date`..`max_date` months
    fn month_in_bounds(&self, month: MonthRef) -> bool {
        self.config.min_date.is_none_or(|min| MonthRef::of(min) <= month)
            && self.config.max_date.is_none_or(|max| month <= MonthRef::of(max))
    }

    /// Text for the footer preview: the start in single mode, otherwise
    /// `start{delimiter}end` once the range is complete.
    pub fn preview_text(&self) -> Option<String> {
        match self.selection {
            Selection::Empty => None,
            Selection::OnePicked { start } => self.config.single_mode.then(|| start.to_string()),
            Selection::Complete { start, .. } if self.config.single_mode => Some(start.to_string()),
            Selection::Complete { start, end } => Some(format!("{start}{}{end}", self.config.delimiter)),
        }
    }

    /// Applying is blocked while a range waits for its second day
    pub fn apply_enabled(&self) -> bool {
        self.config.single_mode || !matches!(self.selection, Selection::OnePicked { .. })
    }

    fn evaluator(&self) -> LockEvaluator<'_> {
        LockEvaluator::new(&self.config, &self.selection).with_filter(self.lock_filter.as_deref())
    }

    fn render_for(&self, calendars: &VisibleCalendars) -> Result<Vec<MonthPanel>, DateError> {
        render::render_panels(&render::RenderContext {
            config: &self.config,
            calendars,
            evaluator: self.evaluator(),
            today: self.today,
        })
    }

    fn sync_today(&mut self) {
        if self.follow_clock {
            self.today = Date::today();
        }
    }

    /// Re-renders the current months
    fn refresh(&mut self) {
        self.sync_today();
        match self.render_for(&self.calendars) {
            Ok(panels) => self.panels = panels,
            Err(err) => tracing::warn!(%err, "failed to render month panels"),
        }
    }

    fn commit_selection(&mut self, next: Selection) {
        tracing::debug!(from = ?self.selection, to = ?next, "selection changed");
        self.selection = next;
        self.refresh();
        self.emit(&PickerEvent::SelectionChanged(next));
    }

    fn commit_calendars(&mut self, next: VisibleCalendars) -> Result<(), NavigationError> {
        self.sync_today();
        let panels = self.render_for(&next)?;
        let previous = std::mem::replace(&mut self.calendars, next);
        self.panels = panels;

        let changed: Vec<(usize, MonthRef)> = self
            .calendars
            .months()
            .iter()
            .enumerate()
            .filter(|(index, month)| previous.get(*index) != Some(**month))
            .map(|(index, month)| (index, *month))
            .collect();
        for (panel, month) in changed {
            tracing::debug!(panel, %month, "visible month changed");
            self.emit(&PickerEvent::MonthChanged { panel, month });
        }
        Ok(())
    }

    fn emit(&mut self, event: &PickerEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::test_utils::{date, month_ref};
    use crate::{DayRule, MONDAY};

    fn picker(config: PickerConfig) -> Picker {
        Picker::new_at(config, date(2024, 3, 1)).expect("failed to build picker")
    }

    fn recorded(picker: &mut Picker) -> Rc<RefCell<Vec<PickerEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        picker.subscribe(move |event: &PickerEvent| sink.borrow_mut().push(*event));
        events
    }

    fn find_cell(picker: &Picker, day: Date) -> Option<DayFlags> {
        picker
            .panels()
            .iter()
            .flat_map(|panel| panel.weeks.iter())
            .flat_map(|week| week.cells.iter())
            .find(|cell| cell.date == day && !cell.flags.is_adjacent_month)
            .map(|cell| cell.flags)
    }

    #[test]
    fn test_two_picks_complete_a_range_in_either_order() {
        let mut forward = picker(PickerConfig::default());
        forward.pick_date(date(2024, 3, 5)).expect("first pick");
        let forward = forward.pick_date(date(2024, 3, 9)).expect("second pick");

        let mut backward = picker(PickerConfig::default());
        backward.pick_date(date(2024, 3, 9)).expect("first pick");
        let backward = backward.pick_date(date(2024, 3, 5)).expect("second pick");

        let expected = Selection::Complete {
            start: date(2024, 3, 5),
            end:   date(2024, 3, 9),
        };
        assert_eq!(forward, expected);
        assert_eq!(backward, expected);
    }

    #[test]
    fn test_reset_returns_to_empty_from_any_state() {
        let mut p = picker(PickerConfig::default());
        assert_eq!(p.reset_selection(), Selection::Empty);

        p.pick_date(date(2024, 3, 5)).expect("first pick");
        assert_eq!(p.reset_selection(), Selection::Empty);

        p.pick_date(date(2024, 3, 5)).expect("first pick");
        p.pick_date(date(2024, 3, 7)).expect("second pick");
        assert_eq!(p.reset_selection(), Selection::Empty);

        let after = p.pick_date(date(2024, 3, 20)).expect("pick after reset");
        assert_eq!(after, Selection::OnePicked { start: date(2024, 3, 20) });
    }

    #[test]
    fn test_single_mode_pick() {
        let mut p = picker(PickerConfig {
            single_mode: true,
            ..PickerConfig::default()
        });
        p.set_visible_month(0, 1, 2024).expect("navigate to January");

        let selection = p.pick_date(date(2024, 1, 1)).expect("pick");
        assert_eq!(selection, Selection::single(date(2024, 1, 1)));

        let flags = find_cell(&p, date(2024, 1, 1)).expect("January 1 is rendered");
        assert!(flags.is_start_date);
        assert!(flags.is_end_date);
        assert_eq!(p.preview_text(), Some("2024-01-01".to_owned()));
    }

    #[test]
    fn test_locked_pick_is_rejected_without_state_change() {
        let mut p = picker(PickerConfig {
            min_days: Some(3),
            ..PickerConfig::default()
        });
        let events = recorded(&mut p);

        p.pick_date(date(2024, 3, 10)).expect("first pick");
        let panels_before = p.panels().to_vec();

        let err = p.pick_date(date(2024, 3, 12)).expect_err("too close to the start");
        assert_eq!(err.reason, LockReason::BelowMinDays);
        assert_eq!(p.selection(), Selection::OnePicked { start: date(2024, 3, 10) });
        assert_eq!(p.panels(), panels_before.as_slice());

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            PickerEvent::PickRejected {
                date:   date(2024, 3, 12),
                reason: LockReason::BelowMinDays,
            }
        );
    }

    #[test]
    fn test_min_days_scenario() {
        let mut p = picker(PickerConfig {
            min_days: Some(3),
            ..PickerConfig::default()
        });
        p.pick_date(date(2024, 3, 10)).expect("first pick");

        for day in [8, 9, 11, 12] {
            assert!(p.is_locked(&date(2024, 3, day)), "2024-03-{day:02} should be locked");
        }
        for day in [7, 13] {
            assert!(!p.is_locked(&date(2024, 3, day)), "2024-03-{day:02} should be selectable");
        }
        assert!(find_cell(&p, date(2024, 3, 11)).is_some_and(|flags| flags.is_locked));

        let complete = p.pick_date(date(2024, 3, 13)).expect("minimum span pick");
        assert_eq!(complete, Selection::range(date(2024, 3, 10), date(2024, 3, 13)));
        assert!(!p.is_locked(&date(2024, 3, 11)), "span rules lapse once complete");
    }

    #[test]
    fn test_max_days_scenario() {
        let mut p = picker(PickerConfig {
            max_days: Some(5),
            ..PickerConfig::default()
        });
        p.pick_date(date(2024, 3, 10)).expect("first pick");

        assert!(p.is_locked(&date(2024, 3, 15)));
        assert!(p.is_locked(&date(2024, 3, 5)));
        assert!(!p.is_locked(&date(2024, 3, 14)));
        assert!(!p.is_locked(&date(2024, 3, 6)));
    }

    #[test]
    fn test_bounds_lock_in_every_state() {
        let mut p = picker(PickerConfig {
            min_date: Some(date(2024, 3, 3)),
            max_date: Some(date(2024, 3, 28)),
            ..PickerConfig::default()
        });
        let outside = [date(2024, 3, 2), date(2024, 3, 29)];

        for _ in 0..3 {
            for day in &outside {
                assert!(p.is_locked(day));
            }
            p.pick_date(date(2024, 3, 10)).expect("pick inside bounds");
        }

        let err = p.pick_date(date(2024, 3, 29)).expect_err("after max_date");
        assert_eq!(err.reason, LockReason::AfterMaxDate);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let mut p = picker(PickerConfig {
            highlighted_days: vec![DayRule::Day(date(2024, 3, 12))],
            ..PickerConfig::default()
        });
        p.pick_date(date(2024, 3, 10)).expect("first pick");

        for day in 1..=31 {
            let d = date(2024, 3, day);
            assert_eq!(p.classify(&d), p.classify(&d));
        }
        assert!(p.classify(&date(2024, 3, 1)).is_today);
        assert!(p.classify(&date(2024, 3, 12)).is_highlighted);
    }

    #[test]
    fn test_require_reset_ignores_picks_while_complete() {
        let mut p = picker(PickerConfig {
            require_reset: true,
            ..PickerConfig::default()
        });
        let events = recorded(&mut p);

        p.pick_date(date(2024, 3, 5)).expect("first pick");
        p.pick_date(date(2024, 3, 9)).expect("second pick");
        let ignored = p.pick_date(date(2024, 3, 20)).expect("ignored pick");

        assert_eq!(ignored, Selection::range(date(2024, 3, 5), date(2024, 3, 9)));
        assert_eq!(events.borrow().len(), 2);

        p.reset_selection();
        let restarted = p.pick_date(date(2024, 3, 20)).expect("pick after reset");
        assert_eq!(restarted, Selection::OnePicked { start: date(2024, 3, 20) });
    }

    #[test]
    fn test_pick_while_complete_restarts_without_require_reset() {
        let mut p = picker(PickerConfig::default());
        p.pick_date(date(2024, 3, 5)).expect("first pick");
        p.pick_date(date(2024, 3, 9)).expect("second pick");
        let restarted = p.pick_date(date(2024, 3, 20)).expect("third pick");
        assert_eq!(restarted, Selection::OnePicked { start: date(2024, 3, 20) });
    }

    #[test]
    fn test_disallow_lock_days_in_range() {
        let mut p = picker(PickerConfig {
            lock_days: vec![DayRule::Day(date(2024, 3, 15))],
            disallow_lock_days_in_range: true,
            ..PickerConfig::default()
        });
        p.pick_date(date(2024, 3, 10)).expect("first pick");

        let err = p.pick_date(date(2024, 3, 20)).expect_err("span covers a locked day");
        assert_eq!(err.reason, LockReason::LockedDaysInRange);
        assert!(!p.is_locked(&date(2024, 3, 20)));

        let ok = p.pick_date(date(2024, 3, 14)).expect("span without locked days");
        assert_eq!(ok, Selection::range(date(2024, 3, 10), date(2024, 3, 14)));
    }

    #[test]
    fn test_lock_filter() {
        let mut p = picker(PickerConfig::default()).with_lock_filter(|day, _| day.weekday() == MONDAY);

        let err = p.pick_date(date(2024, 3, 4)).expect_err("Mondays are filtered");
        assert_eq!(err.reason, LockReason::Filter);
        assert!(find_cell(&p, date(2024, 3, 11)).is_some_and(|flags| flags.is_locked));
        assert!(p.pick_date(date(2024, 3, 5)).is_ok());
    }

    #[test]
    fn test_selection_change_notifies_and_rerenders() {
        let mut p = picker(PickerConfig::default());
        let events = recorded(&mut p);

        p.pick_date(date(2024, 3, 5)).expect("first pick");
        p.pick_date(date(2024, 3, 9)).expect("second pick");

        assert_eq!(
            *events.borrow(),
            vec![
                PickerEvent::SelectionChanged(Selection::OnePicked { start: date(2024, 3, 5) }),
                PickerEvent::SelectionChanged(Selection::range(date(2024, 3, 5), date(2024, 3, 9))),
            ]
        );
        assert!(find_cell(&p, date(2024, 3, 7)).is_some_and(|flags| flags.is_in_range));
        assert!(find_cell(&p, date(2024, 3, 9)).is_some_and(|flags| flags.is_end_date));
    }

    #[test]
    fn test_initial_selection_from_config() {
        let p = picker(PickerConfig {
            start_date: Some(date(2024, 5, 10)),
            end_date: Some(date(2024, 5, 12)),
            ..PickerConfig::default()
        });

        assert_eq!(p.selection(), Selection::range(date(2024, 5, 10), date(2024, 5, 12)));
        assert_eq!(p.visible_months(), &[month_ref(2024, 5)]);
        assert_eq!(p.preview_text(), Some("2024-05-10 - 2024-05-12".to_owned()));
        assert!(find_cell(&p, date(2024, 5, 11)).is_some_and(|flags| flags.is_in_range));
    }

    #[test]
    fn test_set_date_range_checks_bounds_only() {
        let mut p = picker(PickerConfig {
            min_date: Some(date(2024, 3, 1)),
            min_days: Some(10),
            ..PickerConfig::default()
        });

        let selection = p.set_date_range(date(2024, 3, 8), date(2024, 3, 6)).expect("set range");
        assert_eq!(selection, Selection::range(date(2024, 3, 6), date(2024, 3, 8)));

        let err = p.set_date_range(date(2024, 2, 28), date(2024, 3, 6)).expect_err("before min_date");
        assert_eq!(err.reason, LockReason::BeforeMinDate);
        assert_eq!(p.selection(), selection);

        assert_eq!(p.set_date(date(2024, 3, 4)), Ok(Selection::single(date(2024, 3, 4))));
    }

    #[test]
    fn test_preview_and_apply_state() {
        let mut p = picker(PickerConfig {
            delimiter: " ~ ".to_owned(),
            ..PickerConfig::default()
        });
        assert_eq!(p.preview_text(), None);
        assert!(p.apply_enabled());

        p.pick_date(date(2024, 3, 5)).expect("first pick");
        assert_eq!(p.preview_text(), None);
        assert!(!p.apply_enabled());

        p.pick_date(date(2024, 3, 9)).expect("second pick");
        assert_eq!(p.preview_text(), Some("2024-03-05 ~ 2024-03-09".to_owned()));
        assert!(p.apply_enabled());
    }

    #[test]
    fn test_window_navigation() {
        let mut p = picker(PickerConfig {
            number_of_months: 2,
            ..PickerConfig::default()
        });
        let events = recorded(&mut p);
        assert_eq!(p.visible_months(), &[month_ref(2024, 3), month_ref(2024, 4)]);

        p.next_month(0).expect("next window");
        assert_eq!(p.visible_months(), &[month_ref(2024, 5), month_ref(2024, 6)]);

        p.set_visible_month(1, 1, 2025).expect("move window so panel 1 shows January");
        assert_eq!(p.visible_months(), &[month_ref(2024, 12), month_ref(2025, 1)]);
        assert_eq!(p.panels()[1].month, month_ref(2025, 1));

        assert_eq!(events.borrow().len(), 4);
        assert_eq!(
            events.borrow()[3],
            PickerEvent::MonthChanged {
                panel: 1,
                month: month_ref(2025, 1),
            }
        );
    }

    #[test]
    fn test_move_by_one_month() {
        let mut p = picker(PickerConfig {
            number_of_months: 3,
            move_by_one_month: true,
            ..PickerConfig::default()
        });
        p.previous_month(2).expect("previous month");
        assert_eq!(
            p.visible_months(),
            &[month_ref(2024, 2), month_ref(2024, 3), month_ref(2024, 4)]
        );
        p.next_year(0).expect("next year");
        assert_eq!(p.visible_months()[0], month_ref(2025, 2));
    }

    #[test]
    fn test_split_view_navigation() {
        let mut p = picker(PickerConfig {
            number_of_months: 2,
            split_view: true,
            ..PickerConfig::default()
        });
        let events = recorded(&mut p);

        p.next_month(1).expect("advance second panel");
        assert_eq!(p.visible_months(), &[month_ref(2024, 3), month_ref(2024, 5)]);

        p.set_visible_month(0, 12, 2023).expect("move first panel");
        assert_eq!(p.visible_months(), &[month_ref(2023, 12), month_ref(2024, 5)]);

        assert_eq!(
            *events.borrow(),
            vec![
                PickerEvent::MonthChanged {
                    panel: 1,
                    month: month_ref(2024, 5),
                },
                PickerEvent::MonthChanged {
                    panel: 0,
                    month: month_ref(2023, 12),
                },
            ]
        );
    }

    #[test]
    fn test_navigation_respects_bounds() {
        let mut p = picker(PickerConfig {
            min_date: Some(date(2024, 2, 10)),
            max_date: Some(date(2024, 4, 20)),
            move_by_one_month: true,
            ..PickerConfig::default()
        });

        p.previous_month(0).expect("February is still in bounds");
        assert_eq!(p.visible_months(), &[month_ref(2024, 2)]);
        assert!(!p.panels()[0].has_previous);

        let err = p.previous_month(0).expect_err("January is before min_date");
        assert!(matches!(err, NavigationError::OutOfRange { .. }));
        assert_eq!(p.visible_months(), &[month_ref(2024, 2)]);

        let err = p.set_visible_month(0, 6, 2024).expect_err("June is after max_date");
        assert_eq!(err, NavigationError::OutOfRange { month: month_ref(2024, 6) });

        let err = p.next_year(0).expect_err("a year ahead is after max_date");
        assert!(matches!(err, NavigationError::OutOfRange { .. }));

        let err = p.next_month(3).expect_err("no such panel");
        assert_eq!(err, NavigationError::NoSuchPanel { index: 3, count: 1 });
    }

    #[test]
    fn test_set_visible_month_rejects_month_outside_bounds_in_window() {
        let mut p = picker(PickerConfig {
            min_date: Some(date(2024, 3, 10)),
            max_date: Some(date(2024, 8, 20)),
            number_of_months: 2,
            ..PickerConfig::default()
        });
        let events = recorded(&mut p);

        struct TestCase {
            panel: usize,
            month: u32,
            year:  i32,
        }

        let cases = [
            TestCase { panel: 0, month: 2, year: 2024 },
            TestCase { panel: 1, month: 2, year: 2024 },
            TestCase { panel: 0, month: 9, year: 2024 },
            TestCase { panel: 1, month: 9, year: 2024 },
        ];
        for case in &cases {
            let err = p
                .set_visible_month(case.panel, case.month, case.year)
                .expect_err("month outside the bounds");
            assert_eq!(
                err,
                NavigationError::OutOfRange {
                    month: month_ref(case.year, case.month),
                },
                "panel {} to {}-{:02}",
                case.panel,
                case.year,
                case.month
            );
            assert_eq!(p.visible_months(), &[month_ref(2024, 3), month_ref(2024, 4)]);
        }
        assert!(events.borrow().is_empty());

        p.set_visible_month(0, 8, 2024).expect("August is the max_date month");
        assert_eq!(p.visible_months(), &[month_ref(2024, 8), month_ref(2024, 9)]);
    }

    #[test]
    fn test_invalid_configuration_is_fatal() {
        let result = Picker::new_at(
            PickerConfig {
                min_days: Some(4),
                max_days: Some(2),
                ..PickerConfig::default()
            },
            date(2024, 3, 1),
        );
        assert!(matches!(result, Err(ConfigError::SpanBoundsInverted { .. })));
    }

    #[test]
    fn test_set_today_moves_today_flag() {
        let mut p = picker(PickerConfig::default());
        assert!(find_cell(&p, date(2024, 3, 1)).is_some_and(|flags| flags.is_today));

        p.set_today(date(2024, 3, 2));
        assert_eq!(p.today(), date(2024, 3, 2));
        assert!(find_cell(&p, date(2024, 3, 2)).is_some_and(|flags| flags.is_today));
        assert!(find_cell(&p, date(2024, 3, 1)).is_some_and(|flags| !flags.is_today));
        assert!(p.classify(&date(2024, 3, 2)).is_today);
    }

    #[test]
    fn test_set_today_pins_clock_driven_picker() {
        let mut p = Picker::new(PickerConfig::default()).expect("failed to build picker");
        assert!(p.follow_clock);

        p.set_today(date(2000, 1, 1));
        p.next_month(0).expect("navigate forward");
        p.pick_date(p.visible_months()[0].first_day()).expect("pick");

        assert!(!p.follow_clock);
        assert_eq!(p.today(), date(2000, 1, 1));
    }

    #[test]
    fn test_panels_match_fresh_render() {
        let mut p = picker(PickerConfig {
            number_of_months: 2,
            show_week_numbers: true,
            ..PickerConfig::default()
        });
        p.pick_date(date(2024, 3, 30)).expect("first pick");
        p.pick_date(date(2024, 4, 2)).expect("second pick");

        let fresh = p.render_for(&p.calendars).expect("fresh render");
        assert_eq!(p.panels(), fresh.as_slice());
        assert_eq!(p.columns(), 1);
    }
}
