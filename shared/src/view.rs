use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Address, ComparisonResult, EventIdentifier, EventRecord, UiState};
use crate::selectors::{can_compare_selection, is_event_enabled, undeleted_addresses};

pub const USER_PLACEHOLDER: &str = "Select User ID";
pub const NO_ADDRESSES_MESSAGE: &str = "No addresses found.";
pub const CHOOSE_USER_MESSAGE: &str = "Choose a user ID from the dropdown above.";
pub const NO_EVENTS_MESSAGE: &str = "No events found.";
pub const CHOOSE_ADDRESS_MESSAGE: &str = "Select an address to see events";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub error: Option<String>,
    pub user_select: Option<UserSelectView>,
    pub addresses: ListView<AddressView>,
    pub events: EventListView,
    pub comparison: Option<ComparisonView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSelectView {
    pub placeholder: String,
    pub options: Vec<UserOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListView<T> {
    Items { items: Vec<T> },
    Empty { message: String },
}

impl<T> ListView<T> {
    fn from_items(items: Vec<T>, empty_message: &str) -> Self {
        if items.is_empty() {
            Self::Empty {
                message: empty_message.to_string(),
            }
        } else {
            Self::Items { items }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AddressView {
    pub id: String,
    /// The server record exactly as received, pretty-printed.
    pub json: String,
    pub is_selected: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventListView {
    pub list: ListView<EventRow>,
    pub can_compare: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventRow {
    /// Display form of the event identifier; the shell echoes the structured
    /// identifier back when toggling.
    pub key: String,
    pub identifier: EventIdentifier,
    pub label: String,
    pub is_selected: bool,
    pub is_enabled: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComparisonView {
    pub left: Vec<DiffLine>,
    pub right: Vec<DiffLine>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffLine {
    pub key: String,
    pub value: String,
    pub differs: bool,
}

#[must_use]
pub fn build(state: &UiState) -> ViewModel {
    ViewModel {
        error: state.error.clone(),
        user_select: user_select(state),
        addresses: address_list(state),
        events: event_list(state),
        comparison: comparison(state),
    }
}

fn user_select(state: &UiState) -> Option<UserSelectView> {
    if state.user_ids.is_empty() {
        return None;
    }

    let options = state
        .user_ids
        .iter()
        .map(|id| UserOption {
            value: id.to_string(),
            selected: state.selected_user_id.as_ref() == Some(id),
        })
        .collect();

    Some(UserSelectView {
        placeholder: USER_PLACEHOLDER.to_string(),
        options,
    })
}

fn address_list(state: &UiState) -> ListView<AddressView> {
    let items = undeleted_addresses(&state.addresses)
        .into_iter()
        .map(|address| AddressView {
            id: address.id.to_string(),
            json: pretty(address),
            is_selected: state.selected_address_id.as_ref() == Some(&address.id),
        })
        .collect();

    let empty = if state.selected_user_id.is_some() {
        NO_ADDRESSES_MESSAGE
    } else {
        CHOOSE_USER_MESSAGE
    };
    ListView::from_items(items, empty)
}

fn event_list(state: &UiState) -> EventListView {
    let rows = state
        .events
        .iter()
        .map(|event| event_row(state, event))
        .collect();

    let empty = if state.selected_address_id.is_some() {
        NO_EVENTS_MESSAGE
    } else {
        CHOOSE_ADDRESS_MESSAGE
    };

    EventListView {
        list: ListView::from_items(rows, empty),
        can_compare: can_compare_selection(&state.selected_events),
    }
}

fn event_row(state: &UiState, event: &EventRecord) -> EventRow {
    let identifier = event.identifier();
    EventRow {
        key: identifier.to_string(),
        label: format!("{} | {}", event.kind, event.created_at),
        is_selected: state.selected_events.contains(&identifier),
        is_enabled: is_event_enabled(&state.selected_events, &identifier),
        identifier,
    }
}

fn comparison(state: &UiState) -> Option<ComparisonView> {
    if !state.comparing_events {
        return None;
    }
    let ComparisonResult { left, right } = state.comparison_json.as_ref()?;
    Some(ComparisonView {
        left: diff_lines(left, right),
        right: diff_lines(right, left),
    })
}

/// One line per key of `value`, flagged where `other` holds something else.
pub fn diff_lines(value: &Value, other: &Value) -> Vec<DiffLine> {
    match (value, other) {
        (Value::Object(fields), Value::Object(other_fields)) => fields
            .iter()
            .map(|(key, v)| line(key, v, other_fields.get(key)))
            .collect(),
        (Value::Object(fields), _) => fields.iter().map(|(key, v)| line(key, v, None)).collect(),
        (_, Value::Object(_)) => vec![line("value", value, None)],
        _ => vec![line("value", value, Some(other))],
    }
}

fn line(key: &str, value: &Value, other: Option<&Value>) -> DiffLine {
    DiffLine {
        key: key.to_string(),
        value: render_value(value),
        differs: other != Some(value),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pretty(address: &Address) -> String {
    serde_json::to_string_pretty(&address.raw).unwrap_or_default()
}
