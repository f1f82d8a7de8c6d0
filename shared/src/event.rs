use serde::{Deserialize, Serialize};

use crate::capabilities::{FetchOutcome, TimerOutput};
use crate::config::AppConfig;
use crate::epoch::Epoch;
use crate::model::{AddressId, EventIdentifier, UserId};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Shell intents
    AppStarted {
        /// `None` keeps the built-in defaults.
        config: Option<Box<AppConfig>>,
    },
    UserIdsRefreshRequested,
    UserSelected {
        /// `None` when the placeholder option is picked.
        user_id: Option<UserId>,
    },
    AddressClicked {
        address_id: AddressId,
    },
    EventToggled {
        identifier: EventIdentifier,
    },
    CompareClicked,
    ComparisonDismissed,
    ErrorDismissed,

    // Capability responses (boxed to keep enum size small)
    #[serde(skip)]
    UserIdsFetched {
        epoch: Epoch,
        outcome: Box<FetchOutcome>,
    },
    #[serde(skip)]
    UserIdsRetryElapsed {
        epoch: Epoch,
        output: TimerOutput,
    },
    #[serde(skip)]
    AddressesFetched {
        epoch: Epoch,
        outcome: Box<FetchOutcome>,
    },
    #[serde(skip)]
    EventsFetched {
        epoch: Epoch,
        outcome: Box<FetchOutcome>,
    },
    #[serde(skip)]
    EventDetailFetched {
        epoch: Epoch,
        slot: usize,
        outcome: Box<FetchOutcome>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted { .. } => "app_started",
            Self::UserIdsRefreshRequested => "user_ids_refresh_requested",
            Self::UserSelected { .. } => "user_selected",
            Self::AddressClicked { .. } => "address_clicked",
            Self::EventToggled { .. } => "event_toggled",
            Self::CompareClicked => "compare_clicked",
            Self::ComparisonDismissed => "comparison_dismissed",
            Self::ErrorDismissed => "error_dismissed",
            Self::UserIdsFetched { .. } => "user_ids_fetched",
            Self::UserIdsRetryElapsed { .. } => "user_ids_retry_elapsed",
            Self::AddressesFetched { .. } => "addresses_fetched",
            Self::EventsFetched { .. } => "events_fetched",
            Self::EventDetailFetched { .. } => "event_detail_fetched",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::UserIdsRefreshRequested
                | Self::UserSelected { .. }
                | Self::AddressClicked { .. }
                | Self::EventToggled { .. }
                | Self::CompareClicked
                | Self::ComparisonDismissed
                | Self::ErrorDismissed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventId;

    #[test]
    fn shell_events_round_trip_through_json() {
        let event = Event::EventToggled {
            identifier: EventIdentifier::new("2020-01-01", EventId::new("7")),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(serde_json::from_str::<Event>(&json).unwrap(), event);
    }

    #[test]
    fn user_selected_accepts_placeholder() {
        let event: Event = serde_json::from_str(r#"{"UserSelected":{"user_id":null}}"#).unwrap();
        assert_eq!(event, Event::UserSelected { user_id: None });
    }

    #[test]
    fn capability_responses_are_not_user_initiated() {
        assert!(Event::CompareClicked.is_user_initiated());
        assert!(!Event::AppStarted { config: None }.is_user_initiated());
        assert!(!Event::UserIdsRetryElapsed {
            epoch: Epoch::default(),
            output: TimerOutput::Elapsed,
        }
        .is_user_initiated());
    }

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 128,
            "Event enum is {size} bytes, box more variants"
        );
    }
}
