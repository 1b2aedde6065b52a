use serde::{Deserialize, Serialize};

use crate::{Date, DateRange, PickerConfig};

/// The days a picker currently holds.
///
/// A selection moves `Empty -> OnePicked -> Complete` as days are picked and
/// back to `Empty` on reset. `Complete` always has `start <= end`; in single
/// mode both ends are the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case", from = "RawSelection")]
pub enum Selection {
    #[default]
    Empty,
    /// A range has been started but not finished
    OnePicked { start: Date },
    Complete { start: Date, end: Date },
}

/// Wire form of [`Selection`]; a reversed complete range is reordered on the
/// way in.
#[derive(Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
enum RawSelection {
    Empty,
    OnePicked { start: Date },
    Complete { start: Date, end: Date },
}

impl From<RawSelection> for Selection {
    fn from(raw: RawSelection) -> Self {
        match raw {
            RawSelection::Empty => Self::Empty,
            RawSelection::OnePicked { start } => Self::OnePicked { start },
            RawSelection::Complete { start, end } => Self::range(start, end),
        }
    }
}

/// The configuration switches that shape how a pick moves the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionPolicy {
    /// A single pick completes the selection with `start == end`
    pub single_mode:   bool,
    /// Picking while complete does nothing until the selection is reset
    pub require_reset: bool,
}

impl From<&PickerConfig> for SelectionPolicy {
    fn from(config: &PickerConfig) -> Self {
        Self {
            single_mode:   config.single_mode,
            require_reset: config.require_reset,
        }
    }
}

impl Selection {
    /// A complete selection of one day
    pub const fn single(date: Date) -> Self {
        Self::Complete { start: date, end: date }
    }

    /// A complete selection spanning `a` and `b`, in either order
    pub fn range(a: Date, b: Date) -> Self {
        let (start, end) = DateRange::ordered(a, b).dates();
        Self::Complete { start, end }
    }

    pub const fn start(&self) -> Option<Date> {
        match *self {
            Self::Empty => None,
            Self::OnePicked { start } | Self::Complete { start, .. } => Some(start),
        }
    }

    pub const fn end(&self) -> Option<Date> {
        match *self {
            Self::Complete { end, .. } => Some(end),
            Self::Empty | Self::OnePicked { .. } => None,
        }
    }

    /// The start of a range that is still waiting for its second day
    pub const fn pending_start(&self) -> Option<Date> {
        match *self {
            Self::OnePicked { start } => Some(start),
            Self::Empty | Self::Complete { .. } => None,
        }
    }

    /// Number of days held: 0, 1 or 2 (a single-mode selection counts as 2)
    pub const fn picked_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::OnePicked { .. } => 1,
            Self::Complete { .. } => 2,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The selected span once complete
    pub fn as_range(&self) -> Option<DateRange> {
        match *self {
            Self::Complete { start, end } => Some(DateRange::ordered(start, end)),
            Self::Empty | Self::OnePicked { .. } => None,
        }
    }

    /// Computes the selection after picking `date`, or `None` when the pick
    /// leaves the selection as it is. Lock checks happen before this.
    pub fn advance(self, date: Date, policy: SelectionPolicy) -> Option<Self> {
        match self {
            Self::Empty => Some(Self::first_pick(date, policy)),
            Self::OnePicked { start } => Some(Self::range(start, date)),
            Self::Complete { .. } if policy.require_reset => None,
            Self::Complete { .. } => Some(Self::first_pick(date, policy)),
        }
    }

    const fn first_pick(date: Date, policy: SelectionPolicy) -> Self {
        if policy.single_mode {
            Self::single(date)
        } else {
            Self::OnePicked { start: date }
        }
    }
}
