//! Projection of layout, selection and lock rules into per-cell state.
//!
//! Rendering is a full recomputation: every call produces the panels from
//! scratch and never patches a previous result.

use serde::Serialize;

use crate::{
    DAYS_PER_WEEK, Date, DateError, DayFlags, JANUARY, LockEvaluator, MONTHS_PER_YEAR, MonthRef, PickerConfig, Unit,
    VisibleCalendars, YearOrder, layout,
};

/// One day of a rendered panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayCell {
    pub date:  Date,
    pub flags: DayFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WeekRow {
    pub week_number: Option<u32>,
    pub cells:       [DayCell; DAYS_PER_WEEK],
}

/// Entry of the month dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthOption {
    pub month:    u32,
    pub disabled: bool,
    pub selected: bool,
}

/// Entry of the year dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearOption {
    pub year:     i32,
    pub disabled: bool,
    pub selected: bool,
}

/// Everything a presenter needs to draw one month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MonthPanel {
    pub index:         usize,
    pub month:         MonthRef,
    /// Navigation to the previous month is allowed
    pub has_previous:  bool,
    /// Navigation to the next month is allowed
    pub has_next:      bool,
    pub weeks:         Vec<WeekRow>,
    /// Empty unless the month dropdown is enabled
    pub month_options: Vec<MonthOption>,
    /// Empty unless the year dropdown is enabled
    pub year_options:  Vec<YearOption>,
}

/// Inputs of one render pass.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub config:    &'a PickerConfig,
    pub calendars: &'a VisibleCalendars,
    pub evaluator: LockEvaluator<'a>,
    pub today:     Date,
}

/// Renders every visible panel.
///
/// # Errors
/// Returns `DateError::OutOfRange` if a grid day cannot be represented.
pub fn render_panels(ctx: &RenderContext<'_>) -> Result<Vec<MonthPanel>, DateError> {
    tracing::trace!(panels = ctx.calendars.len(), "rendering month panels");
    ctx.calendars
        .months()
        .iter()
        .enumerate()
        .map(|(index, month)| render_month(ctx, index, *month))
        .collect()
}

/// Renders a single panel.
///
/// # Errors
/// Returns `DateError::OutOfRange` if a grid day cannot be represented.
pub fn render_month(ctx: &RenderContext<'_>, index: usize, month: MonthRef) -> Result<MonthPanel, DateError> {
    let config = ctx.config;
    let grid = layout::month_grid(month, config.first_day, config.show_week_numbers)?;

    let weeks = grid
        .weeks
        .iter()
        .map(|week| WeekRow {
            week_number: week.week_number,
            cells:       week.days.map(|day| DayCell {
                date:  day.date,
                flags: DayFlags {
                    is_adjacent_month: day.adjacent,
                    ..ctx.evaluator.classify(&day.date, &ctx.today)
                },
            }),
        })
        .collect();

    let month_options = if config.dropdowns.months {
        month_options(config, month)
    } else {
        Vec::new()
    };
    let year_options = if config.dropdowns.years.is_some() {
        year_options(config, month, ctx.today)
    } else {
        Vec::new()
    };

    Ok(MonthPanel {
        index,
        month,
        has_previous: has_previous(config, month),
        has_next: has_next(config, month),
        weeks,
        month_options,
        year_options,
    })
}

/// The month may be left backwards: it is later than the `min_date` month
pub fn has_previous(config: &PickerConfig, month: MonthRef) -> bool {
    config
        .min_date
        .is_none_or(|min| month.first_day().cmp_at(min, Unit::Month).is_gt())
}

/// The month may be left forwards: it is earlier than the `max_date` month
pub fn has_next(config: &PickerConfig, month: MonthRef) -> bool {
    config
        .max_date
        .is_none_or(|max| month.first_day().cmp_at(max, Unit::Month).is_lt())
}

fn outside_bounds(config: &PickerConfig, day: Date, unit: Unit) -> bool {
    config.min_date.is_some_and(|min| day.cmp_at(min, unit).is_lt())
        || config.max_date.is_some_and(|max| day.cmp_at(max, unit).is_gt())
}

/// The twelve months of the panel's year, disabled outside the date bounds
pub fn month_options(config: &PickerConfig, month: MonthRef) -> Vec<MonthOption> {
    (JANUARY..=MONTHS_PER_YEAR)
        .filter_map(|m| {
            let option = MonthRef::new(month.year(), i32::try_from(m).ok()?).ok()?;
            Some(MonthOption {
                month:    m,
                disabled: outside_bounds(config, option.first_day(), Unit::Month),
                selected: m == month.month(),
            })
        })
        .collect()
}

/// Years from `max_year` (default: the current year) down to `min_year`,
/// reversed for ascending order. A panel year outside that span is added as a
/// disabled, selected entry at the matching end.
pub fn year_options(config: &PickerConfig, month: MonthRef, today: Date) -> Vec<YearOption> {
    let dropdowns = &config.dropdowns;
    let min_year = dropdowns.min_year;
    let max_year = dropdowns.max_year.unwrap_or_else(|| today.year());
    let shown = month.year();

    let out_of_span = |year: i32| YearOption {
        year,
        disabled: true,
        selected: true,
    };

    let mut options = Vec::new();
    if shown > max_year {
        options.push(out_of_span(shown));
    }
    for year in (min_year..=max_year).rev() {
        let disabled = Date::from_ymd(year, 1, 1).is_ok_and(|jan_first| outside_bounds(config, jan_first, Unit::Year));
        options.push(YearOption {
            year,
            disabled,
            selected: year == shown,
        });
    }
    if shown < min_year {
        options.push(out_of_span(shown));
    }

    if dropdowns.years == Some(YearOrder::Asc) {
        options.reverse();
    }
    options
}
