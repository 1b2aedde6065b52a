use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_DELIMITER, DEFAULT_DROPDOWN_MIN_YEAR, DEFAULT_FIRST_DAY, Date, DateError, DayRule, Inclusivity,
    MAX_DROPDOWN_YEAR, MIN_DROPDOWN_YEAR, SATURDAY,
};

/// Everything that shapes selection, locking and layout. Read-only once a
/// picker is built.
///
/// Deserializes from TOML or JSON with every field optional:
///
/// ```toml
/// min_date = "2024-01-01"
/// max_days = 14
/// first_day = 1
/// number_of_months = 2
/// highlighted_days = ["2024-01-10", "2024-02-01/2024-02-05"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Earliest selectable day (inclusive)
    pub min_date: Option<Date>,
    /// Latest selectable day (inclusive)
    pub max_date: Option<Date>,
    /// Shortest span a range may cover
    pub min_days: Option<u32>,
    /// Span bound for the second pick; see the lock rules
    pub max_days: Option<u32>,
    /// Once a start is picked, earlier days are locked
    pub select_forward: bool,
    /// Once a start is picked, later days are locked
    pub select_backward: bool,
    pub single_mode: bool,
    /// Picking on a complete selection is ignored until reset
    pub require_reset: bool,
    /// Initial selection
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub highlighted_days: Vec<DayRule>,
    pub lock_days: Vec<DayRule>,
    /// Endpoint policy for ranges in `lock_days`
    pub lock_days_inclusivity: Inclusivity,
    /// Weekdays that can never be picked, `0 = Sunday`
    pub locked_weekdays: Vec<u8>,
    /// Reject a range whose span covers a locked day
    pub disallow_lock_days_in_range: bool,
    /// First column of the grid, `0 = Sunday ..= 6 = Saturday`
    pub first_day: u8,
    pub number_of_months: usize,
    pub number_of_columns: usize,
    /// Each panel navigates on its own instead of sliding as one window
    pub split_view: bool,
    /// Window navigation steps one month rather than a whole window
    pub move_by_one_month: bool,
    pub show_week_numbers: bool,
    pub dropdowns: Dropdowns,
    /// Placed between start and end in the range preview
    pub delimiter: String,
}

/// Month and year dropdown settings for panel headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dropdowns {
    pub months:   bool,
    /// Year dropdown and its ordering; `None` shows plain text
    pub years:    Option<YearOrder>,
    pub min_year: i32,
    /// Defaults to the current year
    pub max_year: Option<i32>,
}

impl Dropdowns {
    /// The year span must be ordered and stay within
    /// `MIN_DROPDOWN_YEAR..=MAX_DROPDOWN_YEAR`.
    ///
    /// # Errors
    /// Returns `ConfigError::DropdownYearOutOfRange` or
    /// `ConfigError::DropdownYearsInverted`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let years = MIN_DROPDOWN_YEAR..=MAX_DROPDOWN_YEAR;
        if let Some(year) = [Some(self.min_year), self.max_year]
            .into_iter()
            .flatten()
            .find(|year| !years.contains(year))
        {
            return Err(ConfigError::DropdownYearOutOfRange(year));
        }
        match self.max_year {
            Some(max_year) if max_year < self.min_year => Err(ConfigError::DropdownYearsInverted {
                min_year: self.min_year,
                max_year,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearOrder {
    Asc,
    #[default]
    Desc,
}

/// Fatal configuration problems, reported before any picking happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid span configuration: max_days ({max_days}) is less than min_days ({min_days})")]
    SpanBoundsInverted { min_days: u32, max_days: u32 },

    #[error("Invalid span configuration: min_date ({min_date}) is after max_date ({max_date})")]
    DateBoundsInverted { min_date: Date, max_date: Date },

    #[error("Invalid span configuration: min_days must be at least 1")]
    ZeroMinDays,

    #[error("Invalid span configuration: max_days must be at least 1")]
    ZeroMaxDays,

    #[error("Invalid initial selection: start_date ({start}) is after end_date ({end})")]
    InitialSelectionInverted { start: Date, end: Date },

    #[error("Invalid first day of week: {0} (must be 0-6)")]
    InvalidFirstDay(u8),

    #[error("Invalid locked weekday: {0} (must be 0-6)")]
    InvalidWeekday(u8),

    #[error("number_of_months must be at least 1")]
    NoMonths,

    #[error("number_of_columns must be at least 1")]
    NoColumns,

    #[error("Invalid dropdown year: {0} (must be 1-9999)")]
    DropdownYearOutOfRange(i32),

    #[error("Invalid dropdown years: min_year ({min_year}) is after max_year ({max_year})")]
    DropdownYearsInverted { min_year: i32, max_year: i32 },

    /// The initial visible month cannot be represented.
    #[error(transparent)]
    Date(#[from] DateError),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            min_date: None,
            max_date: None,
            min_days: None,
            max_days: None,
            select_forward: false,
            select_backward: false,
            single_mode: false,
            require_reset: false,
            start_date: None,
            end_date: None,
            highlighted_days: Vec::new(),
            lock_days: Vec::new(),
            lock_days_inclusivity: Inclusivity::Inclusive,
            locked_weekdays: Vec::new(),
            disallow_lock_days_in_range: false,
            first_day: DEFAULT_FIRST_DAY,
            number_of_months: 1,
            number_of_columns: 1,
            split_view: false,
            move_by_one_month: false,
            show_week_numbers: false,
            dropdowns: Dropdowns::default(),
            delimiter: DEFAULT_DELIMITER.to_owned(),
        }
    }
}

impl Default for Dropdowns {
    fn default() -> Self {
        Self {
            months:   false,
            years:    None,
            min_year: DEFAULT_DROPDOWN_MIN_YEAR,
            max_year: None,
        }
    }
}

impl PickerConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Toml` for malformed input, or the first
    /// validation failure.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that must hold before any picking happens.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_day > SATURDAY {
            return Err(ConfigError::InvalidFirstDay(self.first_day));
        }
        if let Some(&weekday) = self.locked_weekdays.iter().find(|&&w| w > SATURDAY) {
            return Err(ConfigError::InvalidWeekday(weekday));
        }
        if self.number_of_months == 0 {
            return Err(ConfigError::NoMonths);
        }
        if self.number_of_columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        match (self.min_days, self.max_days) {
            (Some(0), _) => return Err(ConfigError::ZeroMinDays),
            (_, Some(0)) => return Err(ConfigError::ZeroMaxDays),
            (Some(min_days), Some(max_days)) if max_days < min_days => {
                return Err(ConfigError::SpanBoundsInverted { min_days, max_days });
            },
            _ => {},
        }
        if let (Some(min_date), Some(max_date)) = (self.min_date, self.max_date) {
            if min_date > max_date {
                return Err(ConfigError::DateBoundsInverted { min_date, max_date });
            }
        }
        self.dropdowns.validate()?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end && !self.single_mode {
                return Err(ConfigError::InitialSelectionInverted { start, end });
            }
        }
        Ok(())
    }
}
