//! State transitions and the dispatcher that derives them from fetch outcomes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::capabilities::{FetchError, FetchOutcome};
use crate::model::{Address, AddressId, ComparisonResult, EventIdentifier, EventRecord, UserId};

/// A fetchable collection of the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    UserIds,
    Addresses,
    Events,
    EventDetails,
}

impl Resource {
    pub const fn name(self) -> &'static str {
        match self {
            Self::UserIds => "user_ids",
            Self::Addresses => "addresses",
            Self::Events => "events",
            Self::EventDetails => "event_details",
        }
    }

    /// Banner text. Causes are logged, not shown.
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::UserIds => "Unable to load user IDs. Please try again later.",
            Self::Addresses => "Unable to load addresses for this user.",
            Self::Events => "Unable to load events for this address.",
            Self::EventDetails => "Unable to load event details for comparison.",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every transition the store knows. Closed: there is no "unknown" action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    UserIdsFetchSucceeded(Vec<UserId>),
    UserIdsFetchFailed,

    SelectedUserIdChanged(UserId),
    UserSelectionCleared,
    AddressesFetchSucceeded(Vec<Address>),
    AddressesFetchFailed,

    AddressSelected(AddressId),
    EventsFetchSucceeded(Vec<EventRecord>),
    EventsFetchFailed,

    EventSelectionToggled(EventIdentifier),

    ComparisonRequested,
    EventDetailsFetchSucceeded(ComparisonResult),
    EventDetailsFetchFailed { cause: FetchError },
    ComparisonClosed,

    ErrorDismissed,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserIdsFetchSucceeded(_) => "user_ids_fetch_succeeded",
            Self::UserIdsFetchFailed => "user_ids_fetch_failed",
            Self::SelectedUserIdChanged(_) => "selected_user_id_changed",
            Self::UserSelectionCleared => "user_selection_cleared",
            Self::AddressesFetchSucceeded(_) => "addresses_fetch_succeeded",
            Self::AddressesFetchFailed => "addresses_fetch_failed",
            Self::AddressSelected(_) => "address_selected",
            Self::EventsFetchSucceeded(_) => "events_fetch_succeeded",
            Self::EventsFetchFailed => "events_fetch_failed",
            Self::EventSelectionToggled(_) => "event_selection_toggled",
            Self::ComparisonRequested => "comparison_requested",
            Self::EventDetailsFetchSucceeded(_) => "event_details_fetch_succeeded",
            Self::EventDetailsFetchFailed { .. } => "event_details_fetch_failed",
            Self::ComparisonClosed => "comparison_closed",
            Self::ErrorDismissed => "error_dismissed",
        }
    }
}

/// Convert the outcome of a fetch for `resource` into exactly one action.
///
/// For [`Resource::EventDetails`] the payload is a JSON array holding the two
/// detail objects in selection order.
pub fn dispatch(resource: Resource, outcome: FetchOutcome) -> Action {
    match resource {
        Resource::UserIds => match outcome.and_then(decode) {
            Ok(ids) => Action::UserIdsFetchSucceeded(ids),
            Err(_) => Action::UserIdsFetchFailed,
        },
        Resource::Addresses => match outcome.and_then(decode) {
            Ok(addresses) => Action::AddressesFetchSucceeded(addresses),
            Err(_) => Action::AddressesFetchFailed,
        },
        Resource::Events => match outcome.and_then(decode) {
            Ok(events) => Action::EventsFetchSucceeded(events),
            Err(_) => Action::EventsFetchFailed,
        },
        Resource::EventDetails => match outcome.and_then(decode_pair) {
            Ok(pair) => Action::EventDetailsFetchSucceeded(pair),
            Err(cause) => Action::EventDetailsFetchFailed { cause },
        },
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::ParseError {
        reason: e.to_string(),
    })
}

fn decode_pair(value: Value) -> Result<ComparisonResult, FetchError> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            let mut items = items.into_iter();
            match (items.next(), items.next()) {
                (Some(left), Some(right)) => Ok(ComparisonResult { left, right }),
                _ => Err(pair_error(0)),
            }
        }
        Value::Array(items) => Err(pair_error(items.len())),
        _ => Err(FetchError::ParseError {
            reason: "event details must be a JSON array".to_string(),
        }),
    }
}

fn pair_error(len: usize) -> FetchError {
    FetchError::ParseError {
        reason: format!("expected 2 event details, got {len}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_user_ids_success() {
        let action = dispatch(Resource::UserIds, Ok(json!(["1", "42"])));
        assert_eq!(
            action,
            Action::UserIdsFetchSucceeded(vec![UserId::new("1"), UserId::new("42")])
        );
    }

    #[test]
    fn test_failures_map_to_resource_errors() {
        let err = || Err(FetchError::ServerError { status: 500 });
        assert_eq!(dispatch(Resource::UserIds, err()), Action::UserIdsFetchFailed);
        assert_eq!(
            dispatch(Resource::Addresses, err()),
            Action::AddressesFetchFailed
        );
        assert_eq!(dispatch(Resource::Events, err()), Action::EventsFetchFailed);
    }

    #[test]
    fn test_event_details_failure_carries_cause() {
        let action = dispatch(
            Resource::EventDetails,
            Err(FetchError::ClientError { status: 404 }),
        );
        assert_eq!(
            action,
            Action::EventDetailsFetchFailed {
                cause: FetchError::ClientError { status: 404 }
            }
        );
    }

    #[test]
    fn test_wrong_shape_is_a_failure() {
        assert_eq!(
            dispatch(Resource::Addresses, Ok(json!({"id": 1}))),
            Action::AddressesFetchFailed
        );
        assert_eq!(
            dispatch(Resource::Events, Ok(json!([{"id": "a"}]))),
            Action::EventsFetchFailed
        );
    }

    #[test]
    fn test_event_details_pair() {
        let action = dispatch(
            Resource::EventDetails,
            Ok(json!([{"id": "a"}, {"id": "b"}])),
        );
        assert_matches!(action, Action::EventDetailsFetchSucceeded(pair) => {
            assert_eq!(pair.left, json!({"id": "a"}));
            assert_eq!(pair.right, json!({"id": "b"}));
        });
    }

    #[test]
    fn test_event_details_needs_exactly_two() {
        assert_matches!(
            dispatch(Resource::EventDetails, Ok(json!([{"id": "a"}]))),
            Action::EventDetailsFetchFailed {
                cause: FetchError::ParseError { .. }
            }
        );
        assert_matches!(
            dispatch(Resource::EventDetails, Ok(json!({"id": "a"}))),
            Action::EventDetailsFetchFailed {
                cause: FetchError::ParseError { .. }
            }
        );
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(Resource::UserIds.to_string(), "user_ids");
        assert_eq!(Resource::EventDetails.name(), "event_details");
    }
}
