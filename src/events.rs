use crate::{Date, LockReason, MonthRef, Selection};

/// Something that changed (or was refused) on a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerEvent {
    /// The selection moved to a new state
    SelectionChanged(Selection),
    /// A panel now shows a different month
    MonthChanged { panel: usize, month: MonthRef },
    /// A pick was refused; nothing changed
    PickRejected { date: Date, reason: LockReason },
}

/// Receives picker events synchronously, in registration order.
pub trait PickerListener {
    fn on_event(&mut self, event: &PickerEvent);
}

impl<F> PickerListener for F
where
    F: FnMut(&PickerEvent),
{
    fn on_event(&mut self, event: &PickerEvent) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    struct Recorder(Vec<PickerEvent>);

    impl PickerListener for Recorder {
        fn on_event(&mut self, event: &PickerEvent) {
            self.0.push(*event);
        }
    }

    #[test]
    fn test_closures_are_listeners() {
        let mut seen = 0;
        {
            let mut listener = |_: &PickerEvent| seen += 1;
            listener.on_event(&PickerEvent::SelectionChanged(Selection::Empty));
            listener.on_event(&PickerEvent::SelectionChanged(Selection::Empty));
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_struct_listener_records_events() {
        let mut recorder = Recorder(Vec::new());
        let event = PickerEvent::PickRejected {
            date:   date(2024, 3, 4),
            reason: LockReason::BeforeMinDate,
        };
        recorder.on_event(&event);
        assert_eq!(recorder.0, vec![event]);
    }
}
