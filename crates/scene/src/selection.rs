//! Selected-country state.
//!
//! Tracks the single selected country and announces changes on the event
//! bus. Clicking the selected country again keeps it selected; clicking the
//! ocean clears the selection.

use crate::picking::CountrySelection;
use runtime::event_bus::EventBus;
use runtime::frame::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(CountrySelection),
    Cleared,
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Option<CountrySelection>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&CountrySelection> {
        self.current.as_ref()
    }

    /// Apply a pick result and emit an event when the selection changed.
    pub fn apply_pick(
        &mut self,
        pick: Option<CountrySelection>,
        bus: &mut EventBus,
        frame: Frame,
    ) -> SelectionChange {
        match pick {
            Some(selection) => {
                if self.current.as_ref() == Some(&selection) {
                    return SelectionChange::Unchanged;
                }
                bus.emit(
                    frame,
                    "selection",
                    format!("selected {} ({})", selection.name, selection.code),
                );
                self.current = Some(selection.clone());
                SelectionChange::Selected(selection)
            }
            None => {
                if self.current.is_none() {
                    return SelectionChange::Unchanged;
                }
                bus.emit(frame, "selection", "cleared");
                self.current = None;
                SelectionChange::Cleared
            }
        }
    }
}
