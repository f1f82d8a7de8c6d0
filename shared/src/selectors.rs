//! Read-only projections over [`UiState`].

use crate::model::{Address, EventIdentifier, EventRecord, SelectionSet, UiState};

/// Most events that can be selected at once; a comparison needs exactly this many.
pub const SELECTION_CAP: usize = 2;

pub fn undeleted_addresses(addresses: &[Address]) -> Vec<&Address> {
    addresses.iter().filter(|a| !a.is_deleted()).collect()
}

pub fn event_identifier(event: &EventRecord) -> EventIdentifier {
    event.identifier()
}

pub fn can_select_more_events(selection: &SelectionSet) -> bool {
    selection.len() < SELECTION_CAP
}

pub fn can_compare_selection(selection: &SelectionSet) -> bool {
    selection.len() == SELECTION_CAP
}

/// Deselecting is always allowed; selecting only while there is room.
pub fn is_event_enabled(selection: &SelectionSet, identifier: &EventIdentifier) -> bool {
    selection.contains(identifier) || can_select_more_events(selection)
}

/// Selected events in the order they were picked.
pub fn selected_events_in_order(state: &UiState) -> Vec<&EventRecord> {
    state
        .selected_events
        .iter()
        .filter_map(|id| state.events.iter().find(|e| &e.identifier() == id))
        .collect()
}
