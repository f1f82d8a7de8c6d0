//! The single reducer over [`UiState`].

use crate::action::{Action, Resource};
use crate::model::{EventIdentifier, UiState};
use crate::selectors::{can_compare_selection, is_event_enabled};

/// Apply one transition. Pure: the result depends only on the arguments.
#[must_use]
pub fn reduce(mut state: UiState, action: Action) -> UiState {
    match action {
        Action::UserIdsFetchSucceeded(ids) => {
            state.user_ids = ids;
            state.error = None;
        }
        Action::UserIdsFetchFailed => {
            state.error = Some(Resource::UserIds.error_message().to_string());
        }

        Action::SelectedUserIdChanged(user_id) => {
            state.selected_user_id = Some(user_id);
        }
        Action::UserSelectionCleared => {
            state.selected_user_id = None;
            state.addresses.clear();
            clear_address_scope(&mut state);
        }
        Action::AddressesFetchSucceeded(addresses) => {
            state.addresses = addresses;
            state.error = None;
            clear_address_scope(&mut state);
        }
        Action::AddressesFetchFailed => {
            state.error = Some(Resource::Addresses.error_message().to_string());
        }

        Action::AddressSelected(address_id) => {
            state.selected_address_id = Some(address_id);
        }
        Action::EventsFetchSucceeded(events) => {
            state.events = events;
            state.error = None;
            state.selected_events.clear();
            close_comparison(&mut state);
        }
        Action::EventsFetchFailed => {
            state.error = Some(Resource::Events.error_message().to_string());
        }

        Action::EventSelectionToggled(identifier) => toggle_selection(&mut state, identifier),

        Action::ComparisonRequested => {
            if can_compare_selection(&state.selected_events) {
                state.comparing_events = true;
                state.comparison_json = None;
            }
        }
        Action::EventDetailsFetchSucceeded(pair) => {
            if state.comparing_events {
                state.comparison_json = Some(pair);
                state.error = None;
            }
        }
        Action::EventDetailsFetchFailed { cause: _ } => {
            state.error = Some(Resource::EventDetails.error_message().to_string());
            close_comparison(&mut state);
        }
        Action::ComparisonClosed => close_comparison(&mut state),

        Action::ErrorDismissed => {
            state.error = None;
        }
    }
    state
}

fn toggle_selection(state: &mut UiState, identifier: EventIdentifier) {
    if state.selected_events.contains(&identifier) {
        state.selected_events.remove(&identifier);
        return;
    }

    if !is_event_enabled(&state.selected_events, &identifier) {
        return;
    }

    // Selection keys are only meaningful for the loaded event list.
    if state.events.iter().any(|e| e.identifier() == identifier) {
        state.selected_events.insert(identifier);
    }
}

fn clear_address_scope(state: &mut UiState) {
    state.selected_address_id = None;
    state.events.clear();
    state.selected_events.clear();
    close_comparison(state);
}

fn close_comparison(state: &mut UiState) {
    state.comparing_events = false;
    state.comparison_json = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::FetchError;
    use crate::model::{
        Address, AddressId, ComparisonResult, EventId, EventRecord, SelectionSet, UserId,
    };
    use crate::selectors::{can_compare_selection, undeleted_addresses};
    use proptest::prelude::*;
    use serde_json::json;

    fn event(id: &str, created_at: &str) -> EventRecord {
        serde_json::from_value(json!({
            "type": "click",
            "created_at": created_at,
            "id": id,
            "url": format!("/events/{id}"),
        }))
        .unwrap()
    }

    fn ident(created_at: &str, id: &str) -> EventIdentifier {
        EventIdentifier::new(created_at, EventId::new(id))
    }

    fn with_events() -> UiState {
        reduce(
            UiState::default(),
            Action::EventsFetchSucceeded(vec![
                event("a", "t1"),
                event("b", "t2"),
                event("c", "t3"),
            ]),
        )
    }

    fn pair() -> ComparisonResult {
        ComparisonResult {
            left: json!({"id": "a"}),
            right: json!({"id": "b"}),
        }
    }

    fn comparable() -> UiState {
        let state = reduce(with_events(), Action::EventSelectionToggled(ident("t1", "a")));
        reduce(state, Action::EventSelectionToggled(ident("t2", "b")))
    }

    #[test]
    fn test_user_ids_loaded() {
        let state = reduce(
            UiState {
                error: Some("old".into()),
                ..UiState::default()
            },
            Action::UserIdsFetchSucceeded(vec![UserId::new("42")]),
        );
        assert_eq!(state.user_ids, vec![UserId::new("42")]);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_selecting_user_keeps_addresses_until_fetch() {
        let addresses: Vec<Address> = serde_json::from_value(json!([{"id": 1}])).unwrap();
        let state = reduce(
            UiState::default(),
            Action::AddressesFetchSucceeded(addresses.clone()),
        );
        let state = reduce(state, Action::SelectedUserIdChanged(UserId::new("7")));

        assert_eq!(state.selected_user_id, Some(UserId::new("7")));
        assert_eq!(state.addresses, addresses);
    }

    #[test]
    fn test_addresses_replace_clears_downstream() {
        let state = reduce(comparable(), Action::AddressSelected(AddressId::new("1")));
        let state = reduce(state, Action::ComparisonRequested);

        let state = reduce(
            state,
            Action::AddressesFetchSucceeded(
                serde_json::from_value(json!([{"id": 3}])).unwrap(),
            ),
        );

        assert_eq!(state.addresses.len(), 1);
        assert!(state.selected_address_id.is_none());
        assert!(state.events.is_empty());
        assert!(state.selected_events.is_empty());
        assert!(!state.comparing_events);
    }

    #[test]
    fn test_addresses_failure_keeps_addresses() {
        let addresses: Vec<Address> = serde_json::from_value(json!([{"id": 1}])).unwrap();
        let state = reduce(
            UiState::default(),
            Action::AddressesFetchSucceeded(addresses.clone()),
        );
        let state = reduce(state, Action::AddressesFetchFailed);

        assert_eq!(state.addresses, addresses);
        assert_eq!(
            state.error.as_deref(),
            Some(Resource::Addresses.error_message())
        );
    }

    #[test]
    fn test_failure_in_one_resource_keeps_others() {
        let state = reduce(
            comparable(),
            Action::UserIdsFetchSucceeded(vec![UserId::new("1")]),
        );
        let state = reduce(state, Action::EventsFetchFailed);

        assert_eq!(state.user_ids.len(), 1);
        assert_eq!(state.events.len(), 3);
        assert_eq!(state.selected_events.len(), 2);
    }

    #[test]
    fn test_user_selection_cleared() {
        let state = reduce(comparable(), Action::SelectedUserIdChanged(UserId::new("1")));
        let state = reduce(state, Action::UserSelectionCleared);

        assert!(state.selected_user_id.is_none());
        assert!(state.addresses.is_empty());
        assert!(state.events.is_empty());
        assert!(state.selected_events.is_empty());
    }

    #[test]
    fn test_address_selected_keeps_events_until_fetch() {
        let state = reduce(with_events(), Action::AddressSelected(AddressId::new("9")));
        assert_eq!(state.selected_address_id, Some(AddressId::new("9")));
        assert_eq!(state.events.len(), 3);
    }

    #[test]
    fn test_events_replace_clears_selection() {
        let state = reduce(comparable(), Action::EventsFetchSucceeded(vec![event("z", "t9")]));
        assert!(state.selected_events.is_empty());
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_toggle_enforces_cap() {
        let state = comparable();
        let before = state.selected_events.clone();

        let state = reduce(state, Action::EventSelectionToggled(ident("t3", "c")));
        assert_eq!(state.selected_events, before);
    }

    #[test]
    fn test_deselect_is_always_allowed() {
        let state = reduce(comparable(), Action::EventSelectionToggled(ident("t1", "a")));
        assert_eq!(state.selected_events.len(), 1);
        assert!(state.selected_events.contains(&ident("t2", "b")));
    }

    #[test]
    fn test_toggle_ignores_unknown_event() {
        let state = reduce(with_events(), Action::EventSelectionToggled(ident("t1", "zzz")));
        assert!(state.selected_events.is_empty());
    }

    #[test]
    fn test_comparison_requires_full_selection() {
        let state = reduce(with_events(), Action::EventSelectionToggled(ident("t1", "a")));
        let state = reduce(state, Action::ComparisonRequested);
        assert!(!state.comparing_events);

        let state = reduce(comparable(), Action::ComparisonRequested);
        assert!(state.comparing_events);
        assert!(state.comparison_json.is_none());
    }

    #[test]
    fn test_comparison_lifecycle() {
        let state = reduce(comparable(), Action::ComparisonRequested);
        let state = reduce(state, Action::EventDetailsFetchSucceeded(pair()));
        assert!(state.comparing_events);
        assert_eq!(state.comparison_json, Some(pair()));

        let state = reduce(state, Action::ComparisonClosed);
        assert!(!state.comparing_events);
        assert!(state.comparison_json.is_none());
        assert_eq!(state.selected_events.len(), 2);
    }

    #[test]
    fn test_details_after_close_are_ignored() {
        let state = reduce(comparable(), Action::ComparisonRequested);
        let state = reduce(state, Action::ComparisonClosed);
        let state = reduce(state, Action::EventDetailsFetchSucceeded(pair()));
        assert!(state.comparison_json.is_none());
    }

    #[test]
    fn test_details_failure_reverts_comparing() {
        let state = reduce(comparable(), Action::ComparisonRequested);
        let state = reduce(
            state,
            Action::EventDetailsFetchFailed {
                cause: FetchError::ServerError { status: 500 },
            },
        );
        assert!(!state.comparing_events);
        assert!(state.error.is_some());
    }

    #[test]
    fn test_error_dismissed() {
        let state = reduce(UiState::default(), Action::EventsFetchFailed);
        let state = reduce(state, Action::ErrorDismissed);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_user_42_scenario() {
        let state = reduce(
            UiState::default(),
            Action::SelectedUserIdChanged(UserId::new("42")),
        );
        let state = reduce(
            state,
            Action::AddressesFetchSucceeded(
                serde_json::from_value(json!([
                    {"id": 1, "deleted": false},
                    {"id": 2, "deleted": true}
                ]))
                .unwrap(),
            ),
        );

        let visible = undeleted_addresses(&state.addresses);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, AddressId::new("1"));
        assert!(!can_compare_selection(&state.selected_events));
        assert_eq!(state.selected_events, SelectionSet::new());
    }

    proptest! {
        #[test]
        fn toggle_twice_restores_selection(first in 0usize..3, second in 0usize..3, target in 0usize..3) {
            let ids = [ident("t1", "a"), ident("t2", "b"), ident("t3", "c")];
            let state = reduce(with_events(), Action::EventSelectionToggled(ids[first].clone()));
            let state = reduce(state, Action::EventSelectionToggled(ids[second].clone()));

            let before = state.selected_events.clone();
            let state = reduce(state, Action::EventSelectionToggled(ids[target].clone()));
            let state = reduce(state, Action::EventSelectionToggled(ids[target].clone()));

            // A blocked select is a no-op both times, so the set comes back either way.
            prop_assert_eq!(
                state.selected_events.iter().collect::<std::collections::HashSet<_>>(),
                before.iter().collect::<std::collections::HashSet<_>>()
            );
        }
    }
}
