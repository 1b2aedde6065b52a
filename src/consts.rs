/// Number of day slots in one week row of a month grid
pub const DAYS_PER_WEEK: usize = 7;

/// Number of months in a year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Weekday number for Sunday (weekdays count from Sunday = 0)
pub const SUNDAY: u8 = 0;
/// Weekday number for Monday
pub const MONDAY: u8 = 1;
/// Weekday number for Thursday, which anchors the first week of a year
pub const THURSDAY: u8 = 4;
/// Weekday number for Saturday
pub const SATURDAY: u8 = 6;

/// Month number for January
pub const JANUARY: u32 = 1;

/// Text layout of a date (ISO 8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Range separator (ISO 8601 extended format)
pub const RANGE_SEPARATOR: char = '/';

/// Default first day of the week (Monday)
pub const DEFAULT_FIRST_DAY: u8 = MONDAY;
/// Default lowest year offered by the year dropdown
pub const DEFAULT_DROPDOWN_MIN_YEAR: i32 = 1990;
/// Lowest year the year dropdown may offer
pub const MIN_DROPDOWN_YEAR: i32 = 1;
/// Highest year the year dropdown may offer
pub const MAX_DROPDOWN_YEAR: i32 = 9999;
/// Default text placed between start and end in a range preview
pub const DEFAULT_DELIMITER: &str = " - ";
