//! Selection, locking and month-grid layout for a date or date-range picker.
//!
//! The crate holds the state behind a picker widget and leaves drawing to the
//! caller. A [`Picker`] owns a validated [`PickerConfig`], the current
//! [`Selection`] and the months on screen. After each change it exposes
//! [`MonthPanel`]s that give every day cell its flags (start, end, in range,
//! locked, highlighted, today, adjacent month).
//!
//! ```
//! use day_range_picker::{Date, Picker, PickerConfig, Selection};
//!
//! let config = PickerConfig::from_toml_str("min_days = 3").expect("valid config");
//! let today: Date = "2024-03-01".parse().expect("valid date");
//! let mut picker = Picker::new_at(config, today).expect("valid picker");
//!
//! let start: Date = "2024-03-10".parse().expect("valid date");
//! picker.pick_date(start).expect("unlocked day");
//! assert!(picker.is_locked(&"2024-03-11".parse().expect("valid date")));
//!
//! let end: Date = "2024-03-13".parse().expect("valid date");
//! assert_eq!(picker.pick_date(end), Ok(Selection::Complete { start, end }));
//! ```

mod config;
mod consts;
mod date;
mod events;
pub mod layout;
mod lock;
mod picker;
mod prelude;
mod range;
pub mod render;
mod selection;

pub use config::{ConfigError, Dropdowns, PickerConfig, YearOrder};
pub use consts::*;
pub use date::{Date, DateError, Inclusivity, Unit};
pub use events::{PickerEvent, PickerListener};
pub use layout::{MonthRef, VisibleCalendars};
pub use lock::{DayFlags, LockEvaluator, LockFilter, LockReason};
pub use picker::{NavigationError, PickRejected, Picker};
pub use range::{DateRange, DayRule, RangeError};
pub use render::{DayCell, MonthOption, MonthPanel, WeekRow, YearOption};
pub use selection::{Selection, SelectionPolicy};
